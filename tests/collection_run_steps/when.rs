//! When steps for collection run BDD scenarios.

use super::world::{CollectionWorld, run_async};
use crate::test_helpers::fleet::credentials;
use rstest_bdd_macros::when;

#[when("the collection run executes")]
fn collection_run_executes(world: &mut CollectionWorld) {
    let credentials = credentials();
    let service = world.service();
    let writer = world.writer();
    world.last_run = Some(run_async(service.run(&world.nodes, &credentials, &writer)));
}
