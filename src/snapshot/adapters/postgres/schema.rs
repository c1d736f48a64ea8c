//! Diesel schema for appliance and snapshot persistence.

diesel::table! {
    /// Appliances and their latest descriptive facts.
    appliances (serial) {
        /// Serial number, or host name when no serial was reported.
        #[max_length = 64]
        serial -> Varchar,
        /// Host name, falling back to the identifier.
        #[max_length = 128]
        hostname -> Varchar,
        /// Management address.
        #[max_length = 255]
        address -> Nullable<Varchar>,
        /// Reporting management node.
        #[max_length = 128]
        management_node -> Nullable<Varchar>,
        /// Hardware model.
        #[max_length = 64]
        model -> Nullable<Varchar>,
        /// Installed software version.
        #[max_length = 64]
        software_version -> Nullable<Varchar>,
        /// Last upsert timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Per-instant appliance health snapshots.
    metric_snapshots (id) {
        /// Snapshot identifier.
        id -> Uuid,
        /// Owning appliance.
        #[max_length = 64]
        appliance_id -> Varchar,
        /// Collection instant.
        collected_at -> Timestamptz,
        /// Connectivity flag.
        #[max_length = 16]
        connected -> Nullable<Varchar>,
        /// High-availability state.
        #[max_length = 32]
        ha_state -> Nullable<Varchar>,
        /// One-minute load average.
        cpu_one_min -> Nullable<Float8>,
        /// Memory utilization percentage.
        memory_usage -> Nullable<Float8>,
        /// Swap in use.
        swap_used -> Nullable<Float8>,
        /// Active sessions.
        session_count -> Nullable<Int8>,
        /// Session capacity.
        session_max -> Nullable<Int8>,
        /// Logging-service connectivity (`yes`/`no`).
        #[max_length = 16]
        logging_service -> Varchar,
        /// Certificate presence (`yes`/`no`/empty).
        #[max_length = 16]
        device_certificate -> Varchar,
        /// Certificate expiry.
        device_cert_exp -> Nullable<Timestamptz>,
        /// Expiry zone was unrecognized and taken as UTC.
        cert_timezone_assumed -> Bool,
        /// Disk utilization keyed by `disk_<mount>_pct`.
        disk_usage -> Jsonb,
    }
}

diesel::joinable!(metric_snapshots -> appliances (appliance_id));
diesel::allow_tables_to_appear_in_same_query!(appliances, metric_snapshots);
