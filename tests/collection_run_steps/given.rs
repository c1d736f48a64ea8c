//! Given steps for collection run BDD scenarios.

use super::world::CollectionWorld;
use crate::test_helpers::fleet::{address, script_appliance};
use panmetrics::collection::domain::OperationalCommand;
use panmetrics::collection::ports::DeviceApiError;
use rstest_bdd_macros::given;

#[given(r#"a management node "{name}" at "{ip}""#)]
fn a_management_node(world: &mut CollectionWorld, name: String, ip: String) {
    world.add_node(&name, &ip);
}

#[given(r#"the node "{name}" reports appliance "{serial}" at "{ip}""#)]
fn node_reports_appliance(
    world: &mut CollectionWorld,
    name: String,
    serial: String,
    ip: String,
) -> Result<(), eyre::Report> {
    script_appliance(&world.api, &ip);
    world
        .inventories
        .get_mut(&name)
        .ok_or_else(|| eyre::eyre!("unknown management node '{name}'"))?
        .push((serial, ip));
    world.publish_inventory(&name)
}

#[given(r#"the node "{name}" reports appliance "{serial}" without an address"#)]
fn node_reports_unaddressed_appliance(
    world: &mut CollectionWorld,
    name: String,
    serial: String,
) -> Result<(), eyre::Report> {
    world
        .inventories
        .get_mut(&name)
        .ok_or_else(|| eyre::eyre!("unknown management node '{name}'"))?
        .push((serial, String::new()));
    world.publish_inventory(&name)
}

#[given(r#"the node "{name}" is unreachable"#)]
fn node_is_unreachable(world: &mut CollectionWorld, name: String) -> Result<(), eyre::Report> {
    let ip = world
        .node_addresses
        .get(&name)
        .ok_or_else(|| eyre::eyre!("unknown management node '{name}'"))?;
    world.api.mark_unreachable(&address(ip));
    Ok(())
}

#[given(r#"the disk query fails for the appliance at "{ip}""#)]
fn disk_query_fails(world: &mut CollectionWorld, ip: String) {
    let target = address(&ip);
    world.api.fail(
        &target,
        OperationalCommand::ShowDiskSpace,
        DeviceApiError::Timeout {
            address: target.clone(),
        },
    );
}
