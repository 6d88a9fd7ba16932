//! Hotel reservation workload
//!
//! Mostly searches and recommendations around a fixed point, with rare
//! reservations and logins. Every simulated user waits one second between
//! transactions.

use goose::prelude::*;
use rand::Rng;
use std::time::Duration;

pub const SCENARIO_NAME: &str = "HotelReservationUser";

pub const SEARCH_WEIGHT: usize = 600;
pub const RECOMMEND_WEIGHT: usize = 390;
pub const RESERVE_WEIGHT: usize = 5;
pub const LOGIN_WEIGHT: usize = 5;

const WAIT: Duration = Duration::from_secs(1);

const BASE_LAT: f64 = 38.0235;
const BASE_LON: f64 = -122.095;

/// Number of `Cornell_<n>` accounts requests are spread over
const USER_COUNT: u32 = 1;
const HOTEL_COUNT: u32 = 80;

pub fn scenario() -> Result<Scenario, GooseError> {
    Ok(scenario!(SCENARIO_NAME)
        .set_wait_time(WAIT, WAIT)?
        .register_transaction(
            transaction!(search_hotel)
                .set_name("search_hotel")
                .set_weight(SEARCH_WEIGHT)?,
        )
        .register_transaction(
            transaction!(recommend)
                .set_name("recommend")
                .set_weight(RECOMMEND_WEIGHT)?,
        )
        .register_transaction(
            transaction!(reserve)
                .set_name("reserve")
                .set_weight(RESERVE_WEIGHT)?,
        )
        .register_transaction(
            transaction!(user_login)
                .set_name("user_login")
                .set_weight(LOGIN_WEIGHT)?,
        ))
}

/// `2015-04-DD`
pub fn date(day: u32) -> String {
    format!("2015-04-{:02}", day)
}

/// A point in a small box around the reference hotel
pub fn coordinates<R: Rng>(rng: &mut R) -> (f64, f64) {
    let lat = BASE_LAT + (rng.random_range(0..=481) as f64 - 240.5) / 1000.0;
    let lon = BASE_LON + (rng.random_range(0..=325) as f64 - 157.0) / 1000.0;
    (lat, lon)
}

/// Ranking criterion for a uniform coin in `[0, 1)`
pub fn requirement(coin: f64) -> &'static str {
    if coin < 0.33 {
        "dis"
    } else if coin < 0.66 {
        "rate"
    } else {
        "price"
    }
}

pub fn credentials<R: Rng>(rng: &mut R) -> (String, String) {
    let id = rng.random_range(1..=USER_COUNT);
    (format!("Cornell_{}", id), "1".repeat(10))
}

pub fn search_path<R: Rng>(rng: &mut R) -> String {
    let in_day = rng.random_range(9..=23);
    let out_day = rng.random_range(in_day + 1..=24);
    let (lat, lon) = coordinates(rng);
    format!(
        "/hotels?inDate={}&outDate={}&lat={}&lon={}",
        date(in_day),
        date(out_day),
        lat,
        lon
    )
}

pub fn recommend_path<R: Rng>(rng: &mut R) -> String {
    let require = requirement(rng.random::<f64>());
    let (lat, lon) = coordinates(rng);
    format!(
        "/recommendations?require={}&lat={}&lon={}",
        require, lat, lon
    )
}

pub fn reserve_path<R: Rng>(rng: &mut R) -> String {
    let in_day = rng.random_range(9..=23);
    let out_day = in_day + rng.random_range(1..=5);
    let hotel_id = rng.random_range(1..=HOTEL_COUNT);
    let (username, password) = credentials(rng);
    format!(
        "/reservation?inDate={}&outDate={}&hotelId={}&username={}&password={}&number=1&customerName=Cornell_",
        date(in_day),
        date(out_day),
        hotel_id,
        username,
        password
    )
}

pub fn login_path<R: Rng>(rng: &mut R) -> String {
    let (username, password) = credentials(rng);
    format!("/user?username={}&password={}", username, password)
}

async fn search_hotel(user: &mut GooseUser) -> TransactionResult {
    let path = search_path(&mut rand::rng());
    user.get(&path).await?;
    Ok(())
}

async fn recommend(user: &mut GooseUser) -> TransactionResult {
    let path = recommend_path(&mut rand::rng());
    user.get(&path).await?;
    Ok(())
}

async fn reserve(user: &mut GooseUser) -> TransactionResult {
    let path = reserve_path(&mut rand::rng());
    user.post(&path, "").await?;
    Ok(())
}

async fn user_login(user: &mut GooseUser) -> TransactionResult {
    let path = login_path(&mut rand::rng());
    user.get(&path).await?;
    Ok(())
}
