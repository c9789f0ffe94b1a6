use anyhow::Context;
use clap::{Parser, Subcommand};
use hotel_booking::adapters::{ConsoleNotificationSink, TracingNotificationSink};
use hotel_booking::core::{ConfigProvider, NotificationSink};
use hotel_booking::utils::error::ErrorSeverity;
use hotel_booking::utils::{logger, validation::Validate};
use hotel_booking::{
    build_front_desk, AppConfig, BookingError, BookingForm, FailureReason, PriceCalculator,
    TransactionOutcome,
};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "hotel-booking")]
#[command(about = "Book and vacate hotel rooms recorded on a ledger contract")]
struct Args {
    /// Path to TOML configuration file
    #[arg(short, long, default_value = "booking.toml")]
    config: String,

    /// Override the ledger RPC URL from config
    #[arg(long)]
    rpc_url: Option<String>,

    /// Override the signing agent endpoint from config
    #[arg(long)]
    signer: Option<String>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List rooms that are currently free
    Rooms,
    /// Show the maximum number of days a room can be booked for
    MaxStay {
        /// Query the ledger again instead of using the cached value
        #[arg(long)]
        refresh: bool,
    },
    /// Quote the price of a stay
    Quote {
        #[arg(long)]
        days: String,
    },
    /// List the selectable stay lengths with their prices
    StayOptions,
    /// Book a room
    Book {
        #[arg(long)]
        guest: String,
        #[arg(long)]
        room: String,
        #[arg(long)]
        days: String,
    },
    /// Check out of the room booked by the current wallet account
    Checkout,
}

fn exit_code_for_error(error: &BookingError) -> i32 {
    match error.severity() {
        ErrorSeverity::Low => 2,
        ErrorSeverity::Medium => 1,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    }
}

fn exit_code_for_outcome(outcome: &TransactionOutcome) -> i32 {
    match outcome {
        TransactionOutcome::Confirmed(_) => 0,
        TransactionOutcome::Pending => 1,
        TransactionOutcome::Failed(FailureReason::NetworkError(_)) => 1,
        TransactionOutcome::Failed(FailureReason::InvalidInput(_)) => 2,
        TransactionOutcome::Failed(FailureReason::EnvironmentUnavailable) => 3,
        TransactionOutcome::Failed(FailureReason::UserRejected) => 4,
    }
}

fn fail_with(error: BookingError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        error,
        error.category(),
        error.severity()
    );
    eprintln!("❌ {}", error.user_friendly_message());
    eprintln!("💡 Suggestion: {}", error.recovery_suggestion());
    std::process::exit(exit_code_for_error(&error));
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // 初始化日誌
    if args.log_json {
        logger::init_json_logger();
    } else {
        logger::init_cli_logger(args.verbose);
    }

    tracing::info!("🏨 Starting hotel-booking");
    tracing::debug!("📁 Loading configuration from: {}", args.config);

    let mut config = match AppConfig::from_file(&args.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load config file '{}': {}", args.config, e);
            eprintln!("💡 Make sure the file exists and is valid TOML format");
            std::process::exit(1);
        }
    };

    // 套用命令列覆蓋設定
    if let Some(rpc_url) = args.rpc_url {
        config.override_rpc_url(rpc_url);
    }
    if let Some(signer) = args.signer {
        config.override_signer_endpoint(signer);
    }

    if let Err(e) = config.validate() {
        fail_with(e);
    }

    // JSON 模式下通知也寫入日誌
    let notifier: Arc<dyn NotificationSink> = if args.log_json {
        Arc::new(TracingNotificationSink)
    } else {
        Arc::new(ConsoleNotificationSink)
    };

    let desk = build_front_desk(&config, notifier)
        .context("failed to set up ledger and signing agent clients")?;
    let symbol = config.currency_symbol().to_string();

    match args.command {
        Command::Rooms => match desk.available_rooms().await {
            Ok(rooms) if rooms.is_empty() => println!("No available rooms"),
            Ok(rooms) => {
                for room in rooms {
                    println!("Room {}", room);
                }
            }
            Err(e) => fail_with(e),
        },
        Command::MaxStay { refresh } => {
            let constraint = if refresh {
                desk.refresh_max_stay().await
            } else {
                desk.max_stay().await
            };
            if constraint.confirmed {
                println!("Maximum stay: {} days", constraint.max_stay);
            } else {
                println!("Maximum stay: {} days (default, not confirmed by ledger)", constraint.max_stay);
            }
        }
        Command::Quote { days } => match desk.pricing().compute_price_for_input(&days) {
            Ok(amount) => println!("{} {}", PriceCalculator::format_amount(amount), symbol),
            Err(e) => fail_with(e),
        },
        Command::StayOptions => match desk.stay_options().await {
            Ok(options) => {
                for option in options {
                    println!(
                        "{:>8}  {} {}",
                        option.label,
                        PriceCalculator::format_amount(option.price),
                        symbol
                    );
                }
            }
            Err(e) => fail_with(e),
        },
        Command::Book { guest, room, days } => {
            let form = BookingForm {
                guest_name: guest,
                room_number: room,
                days_to_stay: days,
            };
            let request = match desk.prepare_booking(&form) {
                Ok(request) => request,
                Err(e) => fail_with(e),
            };
            println!(
                "💰 Amount to pay: {} {}",
                PriceCalculator::format_amount(request.total_amount_paid()),
                symbol
            );

            let outcome = desk.book(request).await;
            if let TransactionOutcome::Confirmed(confirmation) = &outcome {
                println!("🔗 Transaction: {}", confirmation.receipt.tx_hash);
            }
            std::process::exit(exit_code_for_outcome(&outcome));
        }
        Command::Checkout => {
            let outcome = desk.checkout().await;
            if let TransactionOutcome::Confirmed(confirmation) = &outcome {
                println!("🔗 Transaction: {}", confirmation.receipt.tx_hash);
            }
            std::process::exit(exit_code_for_outcome(&outcome));
        }
    }

    Ok(())
}
