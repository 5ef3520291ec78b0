use std::process::ExitCode;

use clap::Parser;
use partner_list::{DEFAULT_ENDPOINT, PartnerList, PartnerListOptions, PartnerRecord};
use tracing_subscriber::EnvFilter;

/// Fetch the partner list and print one page of it.
#[derive(Debug, Parser)]
#[command(name = "partner-cli")]
struct Args {
    /// Endpoint returning a JSON array of partners.
    #[arg(long, env = "PARTNER_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    /// Page to print, starting from 1.
    #[arg(long, default_value_t = 1)]
    page: usize,

    /// Partners per page.
    #[arg(long, default_value_t = 15)]
    page_size: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let options = PartnerListOptions::new()
        .with_endpoint(args.endpoint)
        .with_page_size(args.page_size);

    let list = match PartnerList::http(&options) {
        Ok(list) => list,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::from(2);
        }
    };

    if let Err(err) = list.load().await {
        eprintln!("{err}");
        return ExitCode::FAILURE;
    }

    if !list.go_to_page(args.page) && args.page != list.current_page_untracked() {
        tracing::warn!(
            requested = args.page,
            total_pages = list.total_pages_untracked(),
            "page out of range, showing page {}",
            list.current_page_untracked()
        );
    }

    print_page(&list);
    for event in list.source().events() {
        tracing::debug!("{event}");
    }
    ExitCode::SUCCESS
}

fn print_page(list: &PartnerList) {
    println!(
        "{:<10} {:<28} {:<11} {:>11} {:>12} {:>12} {:<14}",
        "ID", "PARTNER", "TYPE", "CONVERSIONS", "COMMISSIONS", "GROSS SALES", "CONTRACT"
    );
    list.with_visible_slice(|partners| {
        for partner in partners {
            print_row(partner);
        }
    });
    match list.item_range() {
        Some((first, last)) => println!(
            "\nshowing {first}-{last} of {} (page {} of {})",
            list.total_items(),
            list.current_page_untracked(),
            list.total_pages_untracked()
        ),
        None => println!("\nno partners"),
    }
}

fn print_row(partner: &PartnerRecord) {
    println!(
        "{:<10} {:<28} {:<11} {:>11} {:>12.2} {:>12.2} {:<14}",
        partner.id,
        partner.partner_name,
        partner.partner_type.to_string(),
        partner.conversions,
        partner.commissions,
        partner.gross_sales,
        partner.contract
    );
}
