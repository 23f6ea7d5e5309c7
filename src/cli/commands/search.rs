use crate::config::Config;
use crate::domain::{Endpoint, ProxyRequest};
use crate::models::ResultsView;
use crate::parser::parse_search_query;
use crate::state::SharedState;

pub async fn cmd_search(config: &Config, query: &str, cached: bool) -> anyhow::Result<()> {
    let Some(parsed) = parse_search_query(query) else {
        println!("Please enter a route (LHR-JFK), flight code (BA123) or flight number (123)");
        return Ok(());
    };

    let params = if cached {
        parsed.to_params()
    } else {
        parsed.to_interactive_params()
    };

    println!("Searching for: {query}");

    let state = SharedState::new(config.clone())?;
    let request = ProxyRequest::from_caller(Endpoint::Flights, params, config.general.debug);

    let payload = match state.aviation.fetch(&request).await {
        Ok(response) => response.payload,
        Err(e) => anyhow::bail!("HTTP {}: {}", e.status_code(), e.public_message()),
    };

    match ResultsView::from_payload(&payload) {
        ResultsView::Records(records) => {
            println!();
            println!("Results ({}):", records.len());
            println!("{:-<60}", "");
            for record in &records {
                println!("{record}");
                println!();
            }
        }
        ResultsView::Message(message) => println!("✗ {message}"),
    }

    Ok(())
}
