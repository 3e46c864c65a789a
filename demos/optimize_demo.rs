// Demonstration: optimize beam azimuths for one or two links and print the
// JSON response.
//
// Run from the repo root:
//   cargo run --example optimize_demo -- --algorithm q_learning --links 2 --episodes 1000

use beamlink::api::{LinkSpec, OptimizeRequest};
use beamlink::channel::ChannelParams;
use beamlink::geometry::Position;
use beamlink::optimize_with;
use beamlink::rl::TrainingConfig;

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let algorithm = arg_value(&args, "--algorithm").unwrap_or("q_learning");
    let n_links: usize = arg_value(&args, "--links")
        .and_then(|s| s.parse().ok())
        .unwrap_or(2);
    let episodes: usize = arg_value(&args, "--episodes")
        .and_then(|s| s.parse().ok())
        .unwrap_or(1000);

    if n_links == 0 || n_links > 2 {
        eprintln!("Unsupported --links '{}'; expected 1 or 2.", n_links);
        std::process::exit(2);
    }

    let links = match n_links {
        1 => vec![LinkSpec {
            tx_position: Position::new(0.0, 0.0),
            rx_position: Position::new(100.0, 0.0),
        }],
        _ => vec![
            LinkSpec {
                tx_position: Position::new(0.0, 25.0),
                rx_position: Position::new(100.0, 25.0),
            },
            LinkSpec {
                tx_position: Position::new(0.0, 75.0),
                rx_position: Position::new(100.0, 75.0),
            },
        ],
    };

    let request = OptimizeRequest {
        links,
        algorithm_type: algorithm.to_string(),
    };
    let config = TrainingConfig {
        episodes,
        ..TrainingConfig::default()
    };

    let response = optimize_with(&request, ChannelParams::default(), config);
    match serde_json::to_string_pretty(&response) {
        Ok(json) => println!("{json}"),
        Err(err) => {
            eprintln!("Failed to encode response: {err}");
            std::process::exit(1);
        }
    }
}

fn arg_value<'a>(args: &'a [String], key: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .map(|s| s.as_str())
}
