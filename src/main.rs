use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use listing_filters::admin::{AdminAccess, AdminDashboard, NoticeLevel};
use listing_filters::browse::{
    search_by_code, CodeLookup, HomeView, ListingDetail, ListingSession, ResultsState,
    SyncOutcome,
};
use listing_filters::config::Config;
use listing_filters::filters::{format_thousands, Financing, FilterCriteria, PriceField};
use listing_filters::gateway::HttpGateway;
use listing_filters::models::PropertySummary;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use url::Url;

#[derive(Parser)]
#[command(name = "listing-filters", about = "Browse and manage property listings")]
struct Cli {
    /// Listings API root (overrides LISTINGS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<Url>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search listings with filters in display form (e.g. --type Casa --min-price 100.000)
    Search {
        #[arg(long)]
        code: Option<String>,
        #[arg(long = "type")]
        property_type: Option<String>,
        #[arg(long)]
        city: Option<String>,
        #[arg(long)]
        neighborhood: Option<String>,
        #[arg(long)]
        min_price: Option<String>,
        #[arg(long)]
        max_price: Option<String>,
        /// Only financeable (true) or only non-financeable (false) listings
        #[arg(long)]
        financeable: Option<bool>,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    /// Open a listing page link, e.g. "/imoveis?city=Belem&page=3"
    Open { href: String },
    /// Featured listings and filter options
    Featured,
    /// One listing and its related listings
    Show { id: i64 },
    /// Look up a listing code
    Code { code: String },
    /// Admin commands (needs LISTINGS_ADMIN_TOKEN)
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    List {
        #[arg(long)]
        search: Option<String>,
    },
    Delete { id: i64 },
    Feature { id: i64 },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    info!("🏠 Listing Filters");
    info!("API: {}", config.api_base_url);

    let gateway = HttpGateway::from_config(&config).context("Failed to create HTTP client")?;

    match cli.command {
        Command::Search {
            code,
            property_type,
            city,
            neighborhood,
            min_price,
            max_price,
            financeable,
            page,
        } => {
            let session = ListingSession::new(Arc::new(gateway));
            session.edit_form(|form| {
                *form = FilterCriteria {
                    code,
                    property_type,
                    city,
                    neighborhood,
                    financing: financeable.map(|f| if f { Financing::Yes } else { Financing::No }),
                    ..Default::default()
                };
            });
            if let Some(raw) = min_price {
                session.set_price_input(PriceField::Min, &raw);
            }
            if let Some(raw) = max_price {
                session.set_price_input(PriceField::Max, &raw);
            }

            let ticket = session.submit();
            session.sync(&ticket).await;

            if page > 1 {
                match session.request_page(page) {
                    Some(ticket) => {
                        session.sync(&ticket).await;
                    }
                    None => warn!("Page {} is out of range", page),
                }
            }

            print_session(&session);
        }
        Command::Open { href } => {
            let session = ListingSession::new(Arc::new(gateway));
            let ticket = session.open(&href);
            if let SyncOutcome::Committed(state) = session.sync(&ticket).await {
                info!("Loaded {} ({:?})", href, state);
            }
            print_session(&session);
        }
        Command::Featured => {
            let home = HomeView::load(&gateway).await;
            print_listings(&home.featured);
            println!("Types: {}", home.type_labels.join(", "));
            println!("Cities: {}", home.options.cities.join(", "));
        }
        Command::Show { id } => {
            let detail = ListingDetail::load(&gateway, id).await;
            match detail.listing {
                Some(listing) => {
                    print_listings(std::slice::from_ref(&listing));
                    if let Some(description) = &listing.description {
                        println!("{}\n", description);
                    }
                    println!("Related:");
                    print_listings(&detail.related);
                }
                None => bail!("Listing {} could not be loaded", id),
            }
        }
        Command::Code { code } => match search_by_code(&gateway, &code).await? {
            CodeLookup::Found(query) => println!("/imoveis?{}", query.to_query_string()),
            CodeLookup::NotFound => {
                println!("Verifique se o Código do Imóvel está correto!");
            }
        },
        Command::Admin { action } => {
            let token = match AdminAccess::check(config.admin_token.as_deref()) {
                AdminAccess::Granted(token) => token,
                AdminAccess::Redirect { destination } => {
                    bail!("No admin token configured (redirect to {})", destination)
                }
            };

            let mut dashboard = AdminDashboard::new(gateway.authorized(token));
            if !dashboard.reload().await {
                bail!("Failed to load listings");
            }

            match action {
                AdminAction::List { search } => {
                    let rows = dashboard.search(search.as_deref().unwrap_or(""));
                    for listing in rows {
                        println!(
                            "{:>6}  {:<40}  R$ {:>14}  {:>6} views{}",
                            listing.id,
                            listing.title,
                            format_thousands(listing.price.max(0) as u64),
                            listing.views,
                            if listing.featured { "  ★" } else { "" }
                        );
                    }
                }
                AdminAction::Delete { id } => {
                    dashboard.delete(id).await;
                }
                AdminAction::Feature { id } => {
                    dashboard.toggle_featured(id).await;
                }
            }

            for notice in dashboard.take_notices() {
                match notice.level {
                    NoticeLevel::Success => info!("{}", notice.message),
                    NoticeLevel::Error => warn!("{}", notice.message),
                }
            }
        }
    }

    Ok(())
}

fn print_session<G: listing_filters::gateway::ListingGateway>(session: &ListingSession<G>) {
    let snapshot = session.snapshot();
    info!("📍 {}", snapshot.location);

    match snapshot.results {
        ResultsState::Empty => println!("Nenhum imóvel encontrado para esses filtros."),
        ResultsState::Failed => {
            warn!("Could not load listings, showing what was loaded before");
            print_listings(&snapshot.listings);
        }
        ResultsState::Loaded | ResultsState::NotLoaded => print_listings(&snapshot.listings),
    }

    if let Some(pagination) = snapshot.pagination {
        println!(
            "Page {} of {} ({} listings)",
            pagination.page, pagination.total_pages, pagination.total
        );
    }
}

fn print_listings(listings: &[PropertySummary]) {
    for (i, property) in listings.iter().enumerate() {
        println!(
            "{}. {} (R$ {})",
            i + 1,
            property.title,
            format_thousands(property.price.max(0) as u64)
        );
        if let Some(realtor) = &property.realtor {
            println!("   Corretor: {}", realtor.name);
        }
        println!("   Código: {}", property.id);
        println!("   Fotos: {}", property.images.len());
        println!();
    }
}
