//! Spawn an MCP server, list its tools and optionally call one.
//!
//! Run with: cargo run -p runtime --example list_tools -- python weather.py [tool] [json-args]

use runtime::{McpToolHost, ToolCall, ToolHost};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut args = std::env::args().skip(1);
    let program = args.next().ok_or("usage: list_tools <program> <script> [tool] [json-args]")?;
    let script = args.next().ok_or("missing server script")?;

    println!("Spawning MCP server: {program} {script}");
    let host = McpToolHost::spawn(&program, [&script]).await?;

    println!("\nDiscovered {} tools:", host.specs().len());
    for spec in host.specs() {
        println!("  - {}", spec.name);
        if !spec.description.is_empty() {
            println!("    {}", spec.description);
        }
    }

    if let Some(tool) = args.next() {
        let input = match args.next() {
            Some(json) => serde_json::from_str(&json)?,
            None => serde_json::Value::Null,
        };
        let call = ToolCall {
            id: "example".into(),
            name: tool,
            input,
        };

        println!("\nCalling {}...", call.name);
        match host.execute(&call).await {
            Ok(output) => println!("{}", serde_json::to_string_pretty(&output)?),
            Err(e) => println!("Error: {e}"),
        }
    }

    host.shutdown().await?;
    println!("\nDone!");
    Ok(())
}
