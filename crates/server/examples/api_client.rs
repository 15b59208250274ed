//! Walk through the student record API against a running server.
//!
//! Start the server first (`cargo run -p roster-server`), then
//! `cargo run -p roster-server --example api_client`.

use reqwest::Client;
use serde_json::{json, Value};

const SERVER_URL: &str = "http://localhost:5000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let client = Client::new();

    // Example 1: Health check
    println!("1. Health Check:");
    let resp = client.get(format!("{SERVER_URL}/health")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 2: Create a student
    println!("2. Create Student:");
    let resp = client
        .post(format!("{SERVER_URL}/api/students"))
        .json(&json!({
            "name": "Dorothy Vaughan",
            "age": 29,
            "course": "Computer Science",
            "email": "dorothy.vaughan@example.edu",
            "grade": "A"
        }))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    let created: Value = resp.json().await?;
    println!("Body: {created}");
    println!();

    let Some(id) = created["data"]["id"].as_str().map(str::to_owned) else {
        anyhow::bail!("create did not return an id (is the email already taken?)");
    };

    // Example 3: Validation failure
    println!("3. Create Invalid Student:");
    let resp = client
        .post(format!("{SERVER_URL}/api/students"))
        .json(&json!({ "name": "D", "age": 12, "course": "Alchemy" }))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 4: Update
    println!("4. Update Student:");
    let resp = client
        .put(format!("{SERVER_URL}/api/students/{id}"))
        .json(&json!({ "grade": "B", "course": "Mathematics" }))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 5: List by course
    println!("5. Students in Mathematics:");
    let resp = client
        .get(format!("{SERVER_URL}/api/students/course/Mathematics"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 6: List all
    println!("6. All Students:");
    let resp = client.get(format!("{SERVER_URL}/api/students")).send().await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 7: Delete
    println!("7. Delete Student:");
    let resp = client
        .delete(format!("{SERVER_URL}/api/students/{id}"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);
    println!();

    // Example 8: Fetch the deleted record
    println!("8. Get Deleted Student:");
    let resp = client
        .get(format!("{SERVER_URL}/api/students/{id}"))
        .send()
        .await?;
    println!("Status: {}", resp.status());
    println!("Body: {}", resp.text().await?);

    Ok(())
}
