use anyhow::Result;
use serde::Deserialize;

use chaser_agent::config::Config;
use chaser_agent::domain::deadline::parse_deadline;
use chaser_agent::domain::EmployeeRecord;

#[derive(Debug, Deserialize)]
struct ReadResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.json".to_string());
    let config = Config::load(&config_path.into())?;

    let client = reqwest::Client::new();

    println!("\n=== TESTING WORKFLOW ENDPOINTS ===\n");

    // Test 1: read endpoint
    println!("📍 Testing: read endpoint (GET)");
    println!("   URL: {}", config.workflow.read_url);

    match client.get(&config.workflow.read_url).send().await {
        Ok(response) => {
            let status = response.status();
            println!("   Status: {}", status);

            if status.is_success() {
                let text = response.text().await?;
                match serde_json::from_str::<ReadResponse>(&text) {
                    Ok(body) => {
                        println!("   ✅ SUCCESS!");
                        println!("   Records served: {}", body.data.len());

                        let mut decoded = 0;
                        let mut with_task = 0;
                        let mut bad_deadlines = Vec::new();

                        for value in body.data {
                            let Ok(record) =
                                serde_json::from_value::<EmployeeRecord>(value)
                            else {
                                continue;
                            };
                            decoded += 1;
                            if record.has_task() {
                                with_task += 1;
                            }
                            if let Some(raw) = record.deadline.as_deref() {
                                if !raw.trim().is_empty() && parse_deadline(raw).is_err() {
                                    bad_deadlines.push((record.email.clone(), raw.to_string()));
                                }
                            }
                        }

                        println!("   Decoded: {} | With task: {}", decoded, with_task);
                        if bad_deadlines.is_empty() {
                            println!("   ✅ Every served deadline parses");
                        } else {
                            println!("   ⚠️  Unparseable deadlines:");
                            for (email, raw) in bad_deadlines {
                                println!("      {} → {:?}", email, raw);
                            }
                        }
                    }
                    Err(e) => {
                        println!("   ❌ JSON Parse Error: {}", e);
                        println!("   Response: {}", &text[..text.len().min(500)]);
                    }
                }
            } else {
                println!("   ❌ Failed: HTTP {}", status);
            }
        }
        Err(e) => {
            println!("   ❌ Network Error: {}", e);
        }
    }

    println!();

    // Test 2: update endpoint reachability (no body — expect a 4xx, not a timeout)
    println!("📍 Testing: update endpoint (PUT, empty probe)");
    println!("   URL: {}", config.workflow.update_url);

    match client.put(&config.workflow.update_url).send().await {
        Ok(response) => {
            println!("   Status: {}", response.status());
            println!("   ✅ Reachable (a 4xx here just means the probe body was empty)");
        }
        Err(e) => {
            println!("   ❌ Network Error: {}", e);
        }
    }

    println!();
    println!("=== SUMMARY ===");
    println!("If the read endpoint works, `chaser-agent watch` can render the roster.");
    println!("If deadlines fail to parse, re-assign those tasks to rewrite them.");
    println!();

    Ok(())
}
