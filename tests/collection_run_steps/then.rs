//! Then steps for collection run BDD scenarios.

use super::world::CollectionWorld;
use panmetrics::collection::services::{CollectionRunError, DiscoveryError};
use rstest_bdd_macros::then;

#[then("{count:usize} records are collected")]
fn records_collected(world: &CollectionWorld, count: usize) -> Result<(), eyre::Report> {
    let collected = world.report()?.collection.records.len();
    if collected != count {
        return Err(eyre::eyre!("expected {count} records, found {collected}"));
    }
    Ok(())
}

#[then("{count:usize} management node failure is reported")]
fn node_failures_reported(world: &CollectionWorld, count: usize) -> Result<(), eyre::Report> {
    let failures = world.report()?.collection.failed_nodes.len();
    if failures != count {
        return Err(eyre::eyre!("expected {count} node failures, found {failures}"));
    }
    Ok(())
}

#[then("{count:usize} snapshots are stored")]
fn snapshots_stored(world: &CollectionWorld, count: usize) -> Result<(), eyre::Report> {
    let stored = world
        .repository
        .snapshot_count()
        .map_err(|err| eyre::eyre!("count snapshots: {err}"))?;
    if stored != count {
        return Err(eyre::eyre!("expected {count} snapshots, found {stored}"));
    }
    Ok(())
}

#[then(r#"the record for "{serial}" has no disk metrics"#)]
fn record_has_no_disks(world: &CollectionWorld, serial: String) -> Result<(), eyre::Report> {
    let record = world.record(&serial)?;
    if !record.disks.is_empty() {
        return Err(eyre::eyre!("expected no disk metrics, found {:?}", record.disks));
    }
    Ok(())
}

#[then(r#"the record for "{serial}" reports {count:usize} active sessions"#)]
fn record_reports_sessions(
    world: &CollectionWorld,
    serial: String,
    count: usize,
) -> Result<(), eyre::Report> {
    let record = world.record(&serial)?;
    let expected = u64::try_from(count).ok();
    if record.session_count != expected {
        return Err(eyre::eyre!(
            "expected {count} active sessions, found {:?}",
            record.session_count
        ));
    }
    Ok(())
}

#[then(r#"the record for "{serial}" reports no active sessions"#)]
fn record_reports_no_sessions(world: &CollectionWorld, serial: String) -> Result<(), eyre::Report> {
    let record = world.record(&serial)?;
    if record.session_count.is_some() {
        return Err(eyre::eyre!(
            "expected no session metrics, found {:?}",
            record.session_count
        ));
    }
    Ok(())
}

#[then("the run fails because no management node was reachable")]
fn run_fails_unreachable(world: &CollectionWorld) -> Result<(), eyre::Report> {
    match world.last_run.as_ref() {
        Some(Err(CollectionRunError::Discovery(
            DiscoveryError::NoReachableManagementNode { .. },
        ))) => Ok(()),
        other => Err(eyre::eyre!(
            "expected an unreachable-fleet failure, got {:?}",
            other.map(Result::is_ok)
        )),
    }
}
