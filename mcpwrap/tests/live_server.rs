//! Protocol round-trip tests for the live server.
//!
//! Serves a wrapped library over an in-memory duplex transport and checks that
//! clients see the same catalog the source renderer emits.

use mcpwrap::{FunctionDef, McpWrap, RawParameter, StaticLibrary, WrapConfig};
use pretty_assertions::assert_eq;
use rmcp::model::{CallToolRequestParams, ClientInfo};
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{Value, json};

#[derive(Debug, Clone, Default)]
struct DummyClient;

impl ClientHandler for DummyClient {
    fn get_info(&self) -> ClientInfo {
        ClientInfo::default()
    }
}

fn calculator() -> McpWrap {
    let library = StaticLibrary::builder("calc")
        .version("2.1.0")
        .runtime_version("3.12.4")
        .function(
            FunctionDef::new("add", |args| {
                let a = args.get("a").and_then(Value::as_i64).unwrap_or_default();
                let b = args.get("b").and_then(Value::as_i64).unwrap_or_default();
                Ok(Value::from(a + b))
            })
            .param(RawParameter::new("a").typed("int"))
            .param(RawParameter::new("b").typed("int").with_default("0"))
            .doc("Add two integers."),
        )
        .function(
            FunctionDef::new("divide", |args| {
                let a = args.get("a").and_then(Value::as_f64).unwrap_or_default();
                let b = args.get("b").and_then(Value::as_f64).unwrap_or_default();
                if b == 0.0 {
                    anyhow::bail!("division by zero");
                }
                Ok(Value::from(a / b))
            })
            .param(RawParameter::new("a").typed("float"))
            .param(RawParameter::new("b").typed("float")),
        )
        .function(FunctionDef::new("_helper", |_| Ok(Value::Null)))
        .class("Accumulator")
        .build();

    McpWrap::from_library(library).with_config(WrapConfig::new().with_instructions("Arithmetic."))
}

#[tokio::test]
async fn test_list_tools_matches_rendered_source() -> anyhow::Result<()> {
    let wrap = calculator();
    let (server_transport, client_transport) = tokio::io::duplex(4096);

    let server = wrap.live_server()?;
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = DummyClient.serve(client_transport).await?;

    let tools = client.list_tools(None).await?;
    let names: Vec<&str> = tools.tools.iter().map(|t| t.name.as_ref()).collect();
    assert_eq!(names, vec!["add", "divide"]);

    // Every live tool appears in the rendered source with an identical schema.
    let source = wrap.render("1.6.0")?;
    for tool in &tools.tools {
        let schema = serde_json::to_string(&Value::Object((*tool.input_schema).clone()))?;
        let statement = format!(
            "_register({}, {}, {schema}, getattr(_library, {}))",
            serde_json::to_string(tool.name.as_ref())?,
            serde_json::to_string(tool.description.as_deref().unwrap_or_default())?,
            serde_json::to_string(tool.name.as_ref())?,
        );
        assert!(source.contains(&statement), "missing {statement}");
    }

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}

#[tokio::test]
async fn test_call_tool_forwards_keywords() -> anyhow::Result<()> {
    let (server_transport, client_transport) = tokio::io::duplex(4096);

    let server = calculator().live_server()?;
    let server_handle = tokio::spawn(async move {
        let service = server.serve(server_transport).await?;
        service.waiting().await?;
        anyhow::Ok(())
    });

    let client = DummyClient.serve(client_transport).await?;

    let result = client
        .call_tool(CallToolRequestParams {
            meta: None,
            name: "add".into(),
            arguments: json!({ "b": 5, "a": 2 }).as_object().cloned(),
            task: None,
        })
        .await?;
    let text: String = result
        .content
        .iter()
        .filter_map(|c| c.as_text().map(|t| t.text.clone()))
        .collect();
    assert_eq!(text, "7");

    let failed = client
        .call_tool(CallToolRequestParams {
            meta: None,
            name: "divide".into(),
            arguments: json!({ "a": 1.0, "b": 0.0 }).as_object().cloned(),
            task: None,
        })
        .await?;
    assert_eq!(failed.is_error, Some(true));

    let unknown = client
        .call_tool(CallToolRequestParams {
            meta: None,
            name: "_helper".into(),
            arguments: None,
            task: None,
        })
        .await?;
    assert_eq!(unknown.is_error, Some(true));

    client.cancel().await?;
    server_handle.await??;
    Ok(())
}
