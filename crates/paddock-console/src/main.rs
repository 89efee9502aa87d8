//! Paddock console binary — runs the guest reports against a server and
//! prints the rendered panel HTML to stdout.
//!
//! Usage:
//!
//! ```text
//! paddock-console winning-trainers [--api-url http://localhost:1234/]
//! paddock-console trainer-winnings
//! paddock-console track-activity
//! paddock-console owners-horses <ownerLastName>
//! ```

use paddock_console::{
    forms, render_panel, send_query, QueryCatalog,
};

const DEFAULT_API_URL: &str = "http://localhost:1234/";

fn usage() -> ! {
    eprintln!(
        "usage: paddock-console <winning-trainers|trainer-winnings|track-activity> [--api-url URL]\n\
         \x20      paddock-console owners-horses <ownerLastName> [--api-url URL]"
    );
    std::process::exit(2);
}

struct Args {
    report: String,
    owner_last_name: Option<String>,
    api_url: String,
}

fn parse_args() -> Args {
    let mut args = std::env::args().skip(1);
    let Some(report) = args.next() else { usage() };

    let mut owner_last_name = None;
    let mut api_url = DEFAULT_API_URL.to_string();

    while let Some(arg) = args.next() {
        if arg == "--api-url" {
            match args.next() {
                Some(url) => api_url = url,
                None => usage(),
            }
        } else if owner_last_name.is_none() {
            owner_last_name = Some(arg);
        } else {
            usage();
        }
    }

    Args {
        report,
        owner_last_name,
        api_url,
    }
}

#[tokio::main]
async fn main() {
    let args = parse_args();
    let catalog = QueryCatalog::embedded();

    let query = match args.report.as_str() {
        "winning-trainers" => forms::guest_report_query(catalog, "winningTrainers"),
        "trainer-winnings" => forms::guest_report_query(catalog, "trainerWinnings"),
        "track-activity" => forms::guest_report_query(catalog, "trackActivity"),
        "owners-horses" => match &args.owner_last_name {
            Some(last_name) => forms::build_owners_horses_query(catalog, last_name),
            None => {
                eprintln!("owners-horses requires an owner last name");
                std::process::exit(2);
            }
        },
        _ => usage(),
    };

    let query = match query {
        Ok(query) => query,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    let client = reqwest::Client::new();
    let panel = send_query(&client, &args.api_url, &query).await;
    println!("{}", render_panel(&panel));

    if panel.state == paddock_console::PanelState::Error {
        std::process::exit(1);
    }
}
