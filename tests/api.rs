//! End-to-end tests against a live server on an ephemeral port.
//!
//! Plays use the production random source, so assertions check ledger
//! invariants rather than specific outcomes.

#![allow(clippy::panic, clippy::indexing_slicing, missing_docs)]

use std::net::SocketAddr;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::{Value, json};

use slot_gateway::api;
use slot_gateway::app_state::AppState;
use slot_gateway::config::GameRules;
use slot_gateway::domain::{PlayerRegistry, ThreadRngSource};
use slot_gateway::persistence::LedgerStore;
use slot_gateway::service::GameService;

async fn spawn_server() -> SocketAddr {
    let game_service = Arc::new(GameService::new(
        Arc::new(PlayerRegistry::new()),
        LedgerStore::InMemory,
        Arc::new(ThreadRngSource),
        GameRules::default(),
    ));
    let app = api::build_router().with_state(AppState {
        game_service,
        history_page_size: 10,
        chart_window_days: 30,
    });
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

fn decimal(value: &Value) -> Decimal {
    let Some(Ok(amount)) = value.as_str().map(str::parse::<Decimal>) else {
        panic!("not a decimal string: {value}");
    };
    amount
}

async fn register(client: &reqwest::Client, base: &str, username: &str) -> String {
    let Ok(response) = client
        .post(format!("{base}/api/v1/players"))
        .json(&json!({ "username": username }))
        .send()
        .await
    else {
        panic!("register request failed");
    };
    assert_eq!(response.status(), 201);
    let Ok(body) = response.json::<Value>().await else {
        panic!("register body");
    };
    let Some(id) = body["player_id"].as_str() else {
        panic!("missing player_id");
    };
    id.to_string()
}

async fn get_json(client: &reqwest::Client, url: &str) -> Value {
    let Ok(response) = client.get(url).send().await else {
        panic!("GET {url} failed");
    };
    let Ok(body) = response.json::<Value>().await else {
        panic!("GET {url} body");
    };
    body
}

#[tokio::test]
async fn plays_keep_the_ledger_balanced() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();
    let id = register(&client, &base, "player_one").await;

    let mut plays = 0_u64;
    for _ in 0..25 {
        let Ok(response) = client
            .post(format!("{base}/api/v1/players/{id}/play"))
            .send()
            .await
        else {
            panic!("play request failed");
        };
        if response.status() == 422 {
            break;
        }
        assert_eq!(response.status(), 200);
        let Ok(play) = response.json::<Value>().await else {
            panic!("play body");
        };
        plays += 1;

        let bet = &play["bet_transaction"];
        assert_eq!(bet["transaction_type"], "BET");
        assert_eq!(decimal(&bet["amount"]), Decimal::new(-500, 2));
        let last = if play["win_transaction"].is_null() {
            assert_eq!(play["session"]["result"], "LOSS");
            bet
        } else {
            assert_ne!(play["session"]["result"], "LOSS");
            &play["win_transaction"]
        };
        assert_eq!(decimal(&last["balance_after"]), decimal(&play["balance"]));
    }

    let profile = get_json(&client, &format!("{base}/api/v1/players/{id}")).await;
    assert_eq!(profile["total_games"], plays);
    let balance = decimal(&profile["player"]["balance"]);

    let ledger = get_json(
        &client,
        &format!("{base}/api/v1/players/{id}/transactions?per_page=100"),
    )
    .await;
    let Some(entries) = ledger["data"].as_array() else {
        panic!("ledger data");
    };
    let total: Decimal = entries.iter().map(|e| decimal(&e["amount"])).sum();
    assert_eq!(total, balance - Decimal::new(100_000, 2));
    let Some(newest) = entries.first() else {
        panic!("empty ledger");
    };
    assert_eq!(decimal(&newest["balance_after"]), balance);

    let history = get_json(&client, &format!("{base}/api/v1/players/{id}/sessions")).await;
    assert_eq!(history["pagination"]["per_page"], 10);
    assert_eq!(history["pagination"]["total"], plays);

    let chart = get_json(&client, &format!("{base}/api/v1/players/{id}/chart")).await;
    assert_eq!(chart["days"], 30);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();
    let _ = register(&client, &base, "twin").await;

    let Ok(response) = client
        .post(format!("{base}/api/v1/players"))
        .json(&json!({ "username": "twin" }))
        .send()
        .await
    else {
        panic!("register request failed");
    };
    assert_eq!(response.status(), 409);
    let Ok(body) = response.json::<Value>().await else {
        panic!("error body");
    };
    assert_eq!(body["error"]["code"], 2002);
}

#[tokio::test]
async fn fresh_player_shows_neutral_outcome() {
    let addr = spawn_server().await;
    let base = format!("http://{addr}");
    let client = reqwest::Client::new();
    let id = register(&client, &base, "newcomer").await;

    let last = get_json(&client, &format!("{base}/api/v1/players/{id}/last-outcome")).await;
    assert_eq!(last["numbers"], json!([7, 7, 7, 7, 7]));

    let health = get_json(&client, &format!("{base}/health")).await;
    assert_eq!(health["status"], "healthy");
}
