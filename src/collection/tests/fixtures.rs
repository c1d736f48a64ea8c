//! Canned management API responses and builders shared by the tests.

use crate::collection::adapters::ScriptedDeviceApi;
use crate::collection::domain::{
    ApplianceAddress, ApplianceDescriptor, Credentials, DiscoveredAppliance, ManagementNode,
    ManagementNodeName, OperationalCommand,
};

pub(super) const SESSION_BODY: &str = r#"<response status="success"><result>
<num-active>1200</num-active>
<num-max>262142</num-max>
<pps>4211</pps>
</result></response>"#;

pub(super) const SYSTEM_BODY: &str = r#"<response status="success"><result><system>
<hostname>fw-east-1</hostname>
<model>PA-3220</model>
<sw-version>10.2.4-h2</sw-version>
</system></result></response>"#;

pub(super) const RESOURCES_BODY: &str = r#"<response status="success"><result><![CDATA[
top - 10:00:01 up 12 days,  3:04,  0 users,  load average: 0.53, 0.61, 0.64
Tasks: 180 total,   1 running, 179 sleeping,   0 stopped,   0 zombie
MiB Mem :  15938.6 total,   1026.0 free,   7829.8 used,   7082.7 buff/cache
MiB Swap:   5961.0 total,   5961.0 free,      0.0 used.   7180.3 avail Mem
]]></result></response>"#;

pub(super) const DISK_BODY: &str = r#"<response status="success"><result><![CDATA[
Filesystem      Size  Used Avail Use% Mounted on
/dev/root       7.6G  4.1G  3.2G  57% /
none            7.9G   68K  7.9G   1% /dev
/dev/sda5        16G  5.9G  9.0G  40% /opt/pancfg
/dev/sda6       7.6G  2.5G  4.7G  35% /opt/panrepo
tmpfs           7.9G  352M  7.6G   5% /dev/shm
/dev/sda8        43G   12G   29G  29% /opt/panlogs
truncated row
/dev/sdb1        10G     -     -   -% /mnt/odd
]]></result></response>"#;

pub(super) const LOGGING_ACTIVE_BODY: &str = r#"<response status="success"><result>
<show-logging-status><Conn-Info><entry>
<conn-status>Active</conn-status>
</entry></Conn-Info></show-logging-status>
</result></response>"#;

pub(super) const CERTIFICATE_BODY: &str = r#"<response status="success"><result>
<device-certificate>
<validity>valid</validity>
<status>valid</status>
<not_valid_after>2027/03/01 12:00:00 GMT</not_valid_after>
</device-certificate>
</result></response>"#;

pub(super) fn inventory_body(entries: &[(&str, &str, &str)]) -> String {
    let rendered: String = entries
        .iter()
        .map(|(serial, hostname, ip)| {
            format!(
                "<entry name=\"{serial}\"><serial>{serial}</serial><hostname>{hostname}</hostname>\
                 <ip-address>{ip}</ip-address><model>PA-3220</model><connected>yes</connected>\
                 <ha><state>active</state></ha></entry>"
            )
        })
        .collect();
    ScriptedDeviceApi::success_envelope(&format!("<devices>{rendered}</devices>"))
}

pub(super) fn address(value: &str) -> ApplianceAddress {
    ApplianceAddress::new(value).expect("valid address")
}

pub(super) fn credentials() -> Credentials {
    Credentials::new("api-reader", "secret").expect("valid credentials")
}

pub(super) fn management_node(name: &str, ip: &str) -> ManagementNode {
    ManagementNode::new(
        ManagementNodeName::new(name).expect("valid node name"),
        address(ip),
    )
}

pub(super) fn descriptor(serial: &str, ip: Option<&str>) -> ApplianceDescriptor {
    DiscoveredAppliance {
        hostname: Some(format!("fw-{serial}")),
        serial: Some(serial.to_owned()),
        model: Some(String::from("PA-3220")),
        address: ip.map(address),
        connected: Some(String::from("yes")),
        ha_state: None,
    }
    .managed_by(ManagementNodeName::new("east").expect("valid node name"))
}

/// Scripts every metric command on `ip` with the canned healthy bodies.
pub(super) fn script_healthy_appliance(api: &ScriptedDeviceApi, ip: &str, key: &str) {
    let target = address(ip);
    api.grant_key(&target, key);
    api.respond(&target, OperationalCommand::ShowSessionInfo, SESSION_BODY);
    api.respond(&target, OperationalCommand::ShowSystemInfo, SYSTEM_BODY);
    api.respond(&target, OperationalCommand::ShowSystemResources, RESOURCES_BODY);
    api.respond(&target, OperationalCommand::ShowDiskSpace, DISK_BODY);
    api.respond(&target, OperationalCommand::LoggingServiceStatus, LOGGING_ACTIVE_BODY);
    api.respond(
        &target,
        OperationalCommand::ShowDeviceCertificateStatus,
        CERTIFICATE_BODY,
    );
}

/// Scripts a management node at `ip` reporting `entries`.
pub(super) fn script_management_node(
    api: &ScriptedDeviceApi,
    ip: &str,
    key: &str,
    entries: &[(&str, &str, &str)],
) {
    let target = address(ip);
    api.grant_key(&target, key);
    api.respond(
        &target,
        OperationalCommand::ShowConnectedDevices,
        &inventory_body(entries),
    );
}
