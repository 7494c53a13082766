//! # autowaterd — automatic watering daemon
//!
//! Composition root that wires the watering engine to its adapters and runs
//! the controller until interrupted.
//!
//! ## Responsibilities
//! - Load configuration (`autowater.toml`, env vars)
//! - Initialise `tracing`
//! - Build the engine, the notification gateway and the controller
//! - Spawn the mail worker, the tick driver and the reminder task
//! - Connect the MQTT bus and publish the full state on every new session
//! - Run the stdin console until `Ctrl-C` or end of input, then shut down
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;
mod console;

use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tracing_subscriber::EnvFilter;

use autowater_adapter_mail::{LogMailer, SmtpMailer};
use autowater_adapter_mqtt::MqttBus;
use autowater_app::controller::WateringController;
use autowater_app::driver::Driver;
use autowater_app::gateway::NotificationGateway;
use autowater_app::mail_worker::MailWorker;
use autowater_app::ports::BusPublisher;
use autowater_app::reminder::run_reminders;
use autowater_app::retry::RetryPolicy;
use autowater_app::session::run_state_publisher;
use autowater_domain::engine::WateringEngine;

use crate::config::Config;
use crate::console::{ConsoleCommand, PROMPT};

const INBOUND_CAPACITY: usize = 64;
const MAIL_QUEUE_CAPACITY: usize = 16;
/// How long queued mails may take to drain on shutdown.
const MAIL_DRAIN_GRACE: Duration = Duration::from_secs(30);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    let schedule = config.reminder.schedule()?;
    let engine = WateringEngine::new(config.reservoir.spec(), config.reservoir.initial_reading())
        .context("invalid initial reservoir reading")?;

    // Mail
    let (mail_tx, mail_rx) = mpsc::channel(MAIL_QUEUE_CAPACITY);
    let policy = RetryPolicy::new(config.mail.max_attempts, config.mail.retry_backoff());
    let mail_task = if config.mail.enabled {
        let mailer = SmtpMailer::new(&config.mail).context("failed to set up SMTP mailer")?;
        tokio::spawn(MailWorker::new(mailer, policy).run(mail_rx))
    } else {
        tracing::info!("mail disabled, notifications are only logged");
        tokio::spawn(MailWorker::new(LogMailer, policy).run(mail_rx))
    };

    // Bus and controller
    let (inbound_tx, inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
    let bus = Arc::new(MqttBus::new(config.mqtt.clone(), inbound_tx));
    let gateway = NotificationGateway::new(Arc::clone(&bus), mail_tx);
    let controller = Arc::new(WateringController::new(
        engine,
        gateway,
        config.tick.pump_settle(),
    ));

    // Background tasks
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let driver = Driver::new(Arc::clone(&controller), config.tick.mode, config.tick.interval());
    let driver_task = tokio::spawn(driver.run(inbound_rx, shutdown_rx.clone()));
    let reminder_task = tokio::spawn(run_reminders(
        schedule,
        Arc::clone(&controller),
        shutdown_rx.clone(),
    ));
    let publisher_task = tokio::spawn(run_state_publisher(
        Arc::clone(&controller),
        bus.sessions(),
        shutdown_rx,
    ));

    bus.connect().await;

    run_console(&bus, &controller).await;

    tracing::info!("shutting down");
    shutdown_tx.send_replace(true);
    join("tick driver", driver_task).await;
    join("reminder", reminder_task).await;
    join("state publisher", publisher_task).await;
    bus.disconnect().await;

    // Dropping the last controller handle closes the mail queue.
    drop(controller);
    if tokio::time::timeout(MAIL_DRAIN_GRACE, join("mail worker", mail_task))
        .await
        .is_err()
    {
        tracing::warn!("mail queue not drained before shutdown");
    }
    Ok(())
}

async fn run_console<B: BusPublisher>(bus: &MqttBus, controller: &WateringController<B>) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    print_status(controller);
    loop {
        tokio::select! {
            result = &mut ctrl_c => {
                if let Err(err) = result {
                    tracing::warn!(error = %err, "failed to listen for Ctrl-C");
                }
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => match ConsoleCommand::parse(&line) {
                    ConsoleCommand::Stop => bus.disconnect().await,
                    ConsoleCommand::Start => bus.connect().await,
                    ConsoleCommand::Status => print_status(controller),
                },
                Ok(None) => {
                    tracing::info!("console input closed");
                    break;
                }
                Err(err) => {
                    tracing::warn!(error = %err, "failed to read console input");
                    break;
                }
            },
        }
    }
}

fn print_status<B: BusPublisher>(controller: &WateringController<B>) {
    println!("{}", controller.status());
    println!("{PROMPT}");
}

async fn join(name: &str, task: JoinHandle<()>) {
    if let Err(err) = task.await {
        tracing::warn!(task = name, error = %err, "background task failed");
    }
}
