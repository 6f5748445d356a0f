//! End-to-end run over HTTP: the router is served on an ephemeral port with the in-memory
//! backend and driven with reqwest, the same way a browser client would.

use autoparts_inventory::storage::remote::PartTable;
use autoparts_inventory::{transport, InMemoryBackend, PartRepository, PartType};
use reqwest::multipart::{Form, Part as FilePart};
use serde_json::Value;
use std::sync::Arc;

struct TestServer {
    base_url: String,
    backend: Arc<InMemoryBackend>,
    client: reqwest::Client,
    handle: tokio::task::JoinHandle<()>,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

async fn start() -> Result<TestServer, Box<dyn std::error::Error>> {
    let backend = Arc::new(InMemoryBackend::default());
    let app_state = transport::http::AppState {
        repository: PartRepository::new(backend.clone(), backend.clone()),
    };
    let router = transport::http::create_router(app_state);

    // Bind to an ephemeral port to avoid conflicts if an API server is already running.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let port = listener.local_addr()?.port();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Ok(TestServer {
        base_url: format!("http://127.0.0.1:{}", port),
        backend,
        client: reqwest::Client::new(),
        handle,
    })
}

fn part_form(part_type: &str, brand: &str, model: &str, year: &str, stock: &str) -> Form {
    Form::new()
        .text("part_type", part_type.to_string())
        .text("car_brand", brand.to_string())
        .text("car_model", model.to_string())
        .text("car_year", year.to_string())
        .text("stock_number", stock.to_string())
}

fn with_image(form: Form, name: &str, mime: &str, bytes: Vec<u8>) -> Form {
    let file = FilePart::bytes(bytes)
        .file_name(name.to_string())
        .mime_str(mime)
        .expect("valid mime");
    form.part("image", file)
}

async fn add(server: &TestServer, form: Form) -> Result<(u16, Value), Box<dyn std::error::Error>> {
    let resp = server
        .client
        .post(format!("{}/add-item", server.base_url))
        .multipart(form)
        .send()
        .await?;
    let status = resp.status().as_u16();
    Ok((status, resp.json::<Value>().await?))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_inventory_flow() -> Result<(), Box<dyn std::error::Error>> {
    let server = start().await?;
    let base = server.base_url.clone();

    // --- HEALTH ---
    let health = server.client.get(format!("{}/health", base)).send().await?;
    assert_eq!(health.status().as_u16(), 200);

    // --- ADD ---
    let seeds = [
        ("dash_kit", "Toyota", "Camry", "2020", "DK-1"),
        ("headlight", "Toyota", "Corolla", "2020", "HL-1"),
        ("wiring_harness", "Toyota", "Camry", "2018", "WH-1"),
        ("wiring_harness", "Honda", "Accord", "2020", "WH-2"),
    ];
    let mut ids = Vec::new();
    for (t, brand, model, year, stock) in seeds {
        let form = with_image(part_form(t, brand, model, year, stock), "p.png", "image/png", vec![1; 32]);
        let (status, body) = add(&server, form).await?;
        assert_eq!(status, 201, "{}", body);
        assert!(body["success"].as_bool().unwrap_or(false));
        assert_eq!(body["data"]["stock_number"], stock);
        ids.push(body["data"]["id"].as_str().unwrap_or_default().to_string());
    }

    // Duplicate stock number.
    let dup = with_image(part_form("dash_kit", "Kia", "Rio", "2015", "DK-1"), "d.png", "image/png", vec![1]);
    let (status, body) = add(&server, dup).await?;
    assert_eq!(status, 409);
    assert_eq!(body["code"], "CONFLICT");

    // Client-side validation never reaches the backend.
    let calls = server.backend.remote_calls();
    let big = with_image(
        part_form("dash_kit", "Kia", "Rio", "2015", "DK-BIG"),
        "big.png",
        "image/png",
        vec![0; 6 * 1024 * 1024],
    );
    let (status, body) = add(&server, big).await?;
    assert_eq!(status, 400);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert_eq!(body["error"], "Image size must be less than 5MB");

    let pdf = with_image(part_form("dash_kit", "Kia", "Rio", "2015", "DK-PDF"), "a.pdf", "application/pdf", vec![1]);
    let (status, body) = add(&server, pdf).await?;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "Please select a valid image file");

    let (status, _) = add(&server, part_form("dash_kit", "Kia", "Rio", "2015", "DK-NOIMG")).await?;
    assert_eq!(status, 400);
    assert_eq!(server.backend.remote_calls(), calls);

    // --- SEARCH (remote filtering) ---
    let search: Value = server
        .client
        .get(format!("{}/search?brand=toy&model=&year=2020", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(search["data"]["searched"], true);
    assert_eq!(search["data"]["total"], 2);
    let groups = search["data"]["groups"].as_array().cloned().unwrap_or_default();
    assert_eq!(groups.len(), 2);
    assert_eq!(groups[0]["part_type"], "dash_kit");
    assert_eq!(groups[1]["part_type"], "headlight");

    let home: Value = server.client.get(format!("{}/", base)).send().await?.json().await?;
    assert_eq!(home["data"]["searched"], false);
    assert_eq!(home["data"]["nav"]["links"][0]["active"], true);

    // --- DASHBOARD (client-side category filter) ---
    let dashboard: Value = server
        .client
        .get(format!("{}/dashboard?filter=wiring_harness", base))
        .send()
        .await?
        .json()
        .await?;
    let parts = dashboard["data"]["parts"].as_array().cloned().unwrap_or_default();
    assert_eq!(parts.len(), 2);
    assert!(parts.iter().all(|p| p["part_type"] == "wiring_harness"));
    assert_eq!(dashboard["data"]["summary"]["wiring_harnesses"], 2);
    assert_eq!(dashboard["data"]["summary"]["total"], 4);
    assert_eq!(dashboard["data"]["filter"], "wiring_harness");

    let bad = server
        .client
        .get(format!("{}/dashboard?filter=tyres", base))
        .send()
        .await?;
    assert_eq!(bad.status().as_u16(), 400);

    // --- EDIT ---
    let target = &ids[0];
    let before: Value = server
        .client
        .get(format!("{}/api/parts", base))
        .send()
        .await?
        .json()
        .await?;
    let old_url = before["data"]
        .as_array()
        .and_then(|a| a.iter().find(|p| p["id"] == target.as_str()))
        .map(|p| p["image_url"].clone())
        .unwrap_or(Value::Null);
    assert!(old_url.is_string());

    let edited: Value = server
        .client
        .put(format!("{}/parts/{}", base, target))
        .multipart(part_form("dash_kit", "Toyota", "Camry XSE", "2021", "DK-1"))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(edited["data"]["car_model"], "Camry XSE");
    assert_eq!(edited["data"]["image_url"], old_url);

    let reimaged: Value = server
        .client
        .put(format!("{}/parts/{}", base, target))
        .multipart(with_image(
            part_form("dash_kit", "Toyota", "Camry XSE", "2021", "DK-1"),
            "new.jpg",
            "image/jpeg",
            vec![2; 16],
        ))
        .send()
        .await?
        .json()
        .await?;
    assert_ne!(reimaged["data"]["image_url"], old_url);

    let conflict = server
        .client
        .put(format!("{}/parts/{}", base, target))
        .multipart(part_form("dash_kit", "Toyota", "Camry XSE", "2021", "HL-1"))
        .send()
        .await?;
    assert_eq!(conflict.status().as_u16(), 409);

    let missing = server
        .client
        .put(format!("{}/parts/no-such-id", base))
        .multipart(part_form("dash_kit", "Toyota", "Camry", "2021", "X-1"))
        .send()
        .await?;
    assert_eq!(missing.status().as_u16(), 404);

    // Fields left out of an edit keep their stored values.
    let headlight = &ids[1];
    let partial = Form::new()
        .text("car_brand", "Toyota")
        .text("car_model", "Corolla LE")
        .text("car_year", "2020")
        .text("stock_number", "HL-1");
    let resp = server
        .client
        .put(format!("{}/parts/{}", base, headlight))
        .multipart(partial)
        .send()
        .await?;
    assert_eq!(resp.status().as_u16(), 200);
    let body: Value = resp.json().await?;
    assert_eq!(body["data"]["part_type"], "headlight");
    assert_eq!(body["data"]["car_model"], "Corolla LE");
    let stored = server
        .backend
        .select(&Default::default())
        .await?
        .into_iter()
        .find(|p| &p.id == headlight)
        .map(|p| p.part_type);
    assert_eq!(stored, Some(PartType::Headlight));

    // --- DELETE ---
    let cancelled: Value = server
        .client
        .delete(format!("{}/parts/{}", base, target))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(cancelled["data"]["outcome"], "cancelled");

    // Anything but `true` cancels, answered with the usual envelope.
    for value in ["1", "yes", "TRUE"] {
        let resp = server
            .client
            .delete(format!("{}/parts/{}?confirm={}", base, target, value))
            .send()
            .await?;
        assert_eq!(resp.status().as_u16(), 200);
        let body: Value = resp.json().await?;
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["outcome"], "cancelled");
    }

    let deleted: Value = server
        .client
        .delete(format!("{}/parts/{}?confirm=true", base, target))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(deleted["data"]["outcome"], "deleted");

    let remaining: Value = server
        .client
        .get(format!("{}/remove-item", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(remaining["data"]["total"], 3);
    let still_there = remaining["data"]["parts"]
        .as_array()
        .map(|a| a.iter().any(|p| p["id"] == target.as_str()))
        .unwrap_or(true);
    assert!(!still_there);

    let narrowed: Value = server
        .client
        .get(format!("{}/remove-item?q=wh-", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(narrowed["data"]["total"], 2);

    // --- TRAILING SLASHES ---
    let slashed = server
        .client
        .get(format!("{}/dashboard/?filter=headlight", base))
        .send()
        .await?;
    assert_eq!(slashed.status().as_u16(), 200);
    assert_eq!(slashed.url().path(), "/dashboard");
    let slashed: Value = slashed.json().await?;
    assert_eq!(slashed["data"]["filter"], "headlight");
    assert_eq!(slashed["data"]["nav"]["links"][3]["active"], true);

    let search: Value = server
        .client
        .get(format!("{}/search/", base))
        .send()
        .await?
        .json()
        .await?;
    assert_eq!(search["data"]["nav"]["links"][1]["active"], true);

    // --- NOT FOUND ---
    let lost = server.client.get(format!("{}/garage", base)).send().await?;
    assert_eq!(lost.status().as_u16(), 404);
    let lost: Value = lost.json().await?;
    assert_eq!(lost["data"]["path"], "/garage");

    Ok(())
}
