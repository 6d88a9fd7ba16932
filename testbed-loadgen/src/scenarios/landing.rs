//! Landing page workload: a single GET with a random 1-5 s pause

use goose::prelude::*;
use std::time::Duration;

pub const SCENARIO_NAME: &str = "LandingUser";

const MIN_WAIT: Duration = Duration::from_secs(1);
const MAX_WAIT: Duration = Duration::from_secs(5);

pub fn scenario() -> Result<Scenario, GooseError> {
    Ok(scenario!(SCENARIO_NAME)
        .set_wait_time(MIN_WAIT, MAX_WAIT)?
        .register_transaction(transaction!(landing_page).set_name("landing")))
}

async fn landing_page(user: &mut GooseUser) -> TransactionResult {
    user.get("/").await?;
    Ok(())
}
