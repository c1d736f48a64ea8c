//! Behaviour tests for a full collection run.

#![expect(
    clippy::expect_used,
    reason = "Test code uses expect for assertion clarity"
)]

mod collection_run_steps;
mod test_helpers;

use collection_run_steps::world::{CollectionWorld, world};
use rstest_bdd_macros::scenario;

#[scenario(
    path = "tests/features/collection_run.feature",
    name = "One management node is unreachable"
)]
#[tokio::test(flavor = "multi_thread")]
async fn unreachable_management_node(world: CollectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/collection_run.feature",
    name = "A failing disk query leaves other metrics intact"
)]
#[tokio::test(flavor = "multi_thread")]
async fn failing_disk_query(world: CollectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/collection_run.feature",
    name = "An appliance without an address is recorded by identity"
)]
#[tokio::test(flavor = "multi_thread")]
async fn appliance_without_address(world: CollectionWorld) {
    let _ = world;
}

#[scenario(
    path = "tests/features/collection_run.feature",
    name = "Every management node is unreachable"
)]
#[tokio::test(flavor = "multi_thread")]
async fn every_management_node_unreachable(world: CollectionWorld) {
    let _ = world;
}
