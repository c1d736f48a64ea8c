//! Scripted management nodes and appliances answering with realistic
//! response bodies.

use panmetrics::collection::adapters::ScriptedDeviceApi;
use panmetrics::collection::domain::{
    ApplianceAddress, Credentials, ManagementNode, ManagementNodeName, OperationalCommand,
};

const SESSION: &str = "<num-active>1200</num-active><num-max>262142</num-max>";

const SYSTEM: &str = "<system><model>PA-3220</model><sw-version>10.2.4</sw-version></system>";

const RESOURCES: &str = "<![CDATA[
top - 10:00:01 up 12 days,  3:04,  0 users,  load average: 0.53, 0.61, 0.64
MiB Mem :   2048.0 total,   1024.0 free,    512.0 used,    512.0 buff/cache
MiB Swap:   1024.0 total,   1000.0 free,     24.0 used.   1400.0 avail Mem
]]>";

const DISK: &str = "<![CDATA[
Filesystem      Size  Used Avail Use% Mounted on
/dev/root       7.6G  4.1G  3.2G  57% /
/dev/sda5        16G  5.9G  9.0G  40% /opt/pancfg
]]>";

const LOGGING: &str = "<entry><conn-status>Active</conn-status></entry>";

const CERTIFICATE: &str = "<device-certificate><validity>valid</validity>\
    <not_valid_after>2027/03/01 12:00:00 PST</not_valid_after></device-certificate>";

/// Parses an address literal.
pub fn address(value: &str) -> ApplianceAddress {
    ApplianceAddress::new(value).expect("valid address")
}

/// Credentials used throughout the integration tests.
pub fn credentials() -> Credentials {
    Credentials::new("api-reader", "secret").expect("valid credentials")
}

/// Builds a management node definition.
pub fn management_node(name: &str, ip: &str) -> ManagementNode {
    ManagementNode::new(
        ManagementNodeName::new(name).expect("valid node name"),
        address(ip),
    )
}

/// Scripts every metric command on the appliance at `ip`.
pub fn script_appliance(api: &ScriptedDeviceApi, ip: &str) {
    let target = address(ip);
    api.grant_key(&target, &format!("KEY-{ip}"));
    for (command, inner) in [
        (OperationalCommand::ShowSessionInfo, SESSION),
        (OperationalCommand::ShowSystemInfo, SYSTEM),
        (OperationalCommand::ShowSystemResources, RESOURCES),
        (OperationalCommand::ShowDiskSpace, DISK),
        (OperationalCommand::LoggingServiceStatus, LOGGING),
        (OperationalCommand::ShowDeviceCertificateStatus, CERTIFICATE),
    ] {
        api.respond(&target, command, &ScriptedDeviceApi::success_envelope(inner));
    }
}

/// Scripts a management node at `ip` reporting `(serial, ip)` entries.
pub fn script_management_node(api: &ScriptedDeviceApi, ip: &str, appliances: &[(String, String)]) {
    let target = address(ip);
    api.grant_key(&target, &format!("MGMT-{ip}"));
    let entries: String = appliances
        .iter()
        .map(|(serial, appliance_ip)| {
            format!(
                "<entry name=\"{serial}\"><serial>{serial}</serial>\
                 <hostname>fw-{serial}</hostname><ip-address>{appliance_ip}</ip-address>\
                 <connected>yes</connected></entry>"
            )
        })
        .collect();
    api.respond(
        &target,
        OperationalCommand::ShowConnectedDevices,
        &ScriptedDeviceApi::success_envelope(&format!("<devices>{entries}</devices>")),
    );
}
