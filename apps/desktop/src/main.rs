//! Imperative terminal binding: a line-driven loop over the session core
//! that reprints the active screen after every accepted transition.

use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use session_core::{
    CoordinationSession, Credentials, EmergencyForm, EmergencyLifecycle, SessionCommand,
    SessionConfig, SessionEvent,
};
use shared::domain::{
    DonorResponseId, NearbyRequestId, UrgencyLevel, UserRole, ViewState,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
struct Args {
    /// Simulated broadcast delay in milliseconds.
    #[arg(long, default_value_t = 3000)]
    broadcast_delay_ms: u64,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt().with_env_filter("info").init();
    let args = Args::parse();

    let config = SessionConfig {
        broadcast_delay: Duration::from_millis(args.broadcast_delay_ms),
    };
    let (mut session, mut internal_rx) = CoordinationSession::new(config);
    let mut events = session.subscribe_events();

    println!("Blood Connect terminal. Type 'help' for commands, 'quit' to exit.");
    print_screen(&session);

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                let line = line.trim().to_string();
                if line.is_empty() {
                    continue;
                }
                if line == "quit" || line == "exit" {
                    break;
                }
                if line == "help" {
                    print_help();
                    continue;
                }
                match parse_command(&session, &line) {
                    Ok(command) => apply(&mut session, &mut events, command),
                    Err(message) => println!("! {message}"),
                }
            }
            Some(command) = internal_rx.recv() => {
                apply(&mut session, &mut events, command);
            }
        }
    }

    Ok(())
}

fn apply(
    session: &mut CoordinationSession,
    events: &mut tokio::sync::broadcast::Receiver<SessionEvent>,
    command: SessionCommand,
) {
    match session.dispatch(command) {
        Ok(()) => {
            drain_events(events);
            print_screen(session);
        }
        Err(err) => println!("! {err}"),
    }
}

fn drain_events(events: &mut tokio::sync::broadcast::Receiver<SessionEvent>) {
    while let Ok(event) = events.try_recv() {
        match event {
            SessionEvent::ResponseAcknowledged(message) => println!("* {message}"),
            SessionEvent::EmergencySubmitted(request) => {
                match serde_json::to_string(&request) {
                    Ok(payload) => println!("* broadcast payload: {payload}"),
                    Err(err) => tracing::warn!("failed to encode request payload: {err}"),
                }
            }
            SessionEvent::SignedIn(profile) => {
                println!("* Welcome {}! Redirecting to your dashboard...", profile.name);
            }
            _ => {}
        }
    }
}

fn parse_command(session: &CoordinationSession, line: &str) -> Result<SessionCommand, String> {
    let (verb, rest) = match line.split_once(char::is_whitespace) {
        Some((verb, rest)) => (verb, rest.trim()),
        None => (line, ""),
    };

    match verb {
        "donor" => Ok(SessionCommand::SelectRole(UserRole::Donor)),
        "recipient" => Ok(SessionCommand::SelectRole(UserRole::Recipient)),
        "login" => parse_login(rest),
        "quick" => {
            let role = UserRole::parse(rest)
                .ok_or_else(|| format!("unknown role '{rest}', expected donor or recipient"))?;
            Ok(SessionCommand::QuickSignIn(role))
        }
        "signout" => Ok(SessionCommand::SignOut),
        "map" => Ok(SessionCommand::NavigateToMap),
        "back" => Ok(SessionCommand::NavigateBack),
        "emergency" => Ok(SessionCommand::OpenEmergencyForm),
        "send" if rest.is_empty() => Ok(SessionCommand::QuickEmergencyRequest),
        "send" => parse_send(session, rest),
        "dismiss" | "cancel" => Ok(SessionCommand::DismissEmergency),
        "respond" => {
            let id = parse_row_number(rest)?;
            Ok(SessionCommand::RespondToRequest(NearbyRequestId(id)))
        }
        "contact" => {
            let id = parse_row_number(rest)?;
            Ok(SessionCommand::ContactDonor(DonorResponseId(id)))
        }
        other => Err(format!("unknown command '{other}', try 'help'")),
    }
}

fn parse_login(rest: &str) -> Result<SessionCommand, String> {
    let fields: Vec<&str> = rest.split(';').map(str::trim).collect();
    if fields.len() != 4 {
        return Err("usage: login <name>;<phone>;<blood type>;<location>".to_string());
    }
    Ok(SessionCommand::SubmitCredentials(Credentials {
        name: fields[0].to_string(),
        phone: fields[1].to_string(),
        blood_type: fields[2].to_string(),
        location: fields[3].to_string(),
    }))
}

fn parse_send(session: &CoordinationSession, rest: &str) -> Result<SessionCommand, String> {
    let draft = match session.emergency() {
        EmergencyLifecycle::Form(form) => form.clone(),
        _ => return Err("no emergency form open; run 'emergency' first".to_string()),
    };

    let fields: Vec<&str> = rest.split(';').map(str::trim).collect();
    if fields.len() < 3 || fields.len() > 4 {
        return Err("usage: send <units>;<location>;<urgency>[;<notes>]".to_string());
    }
    let urgency = UrgencyLevel::parse(fields[2])
        .ok_or_else(|| format!("unknown urgency '{}'", fields[2]))?;

    Ok(SessionCommand::SubmitEmergencyForm(EmergencyForm {
        blood_type: draft.blood_type,
        units_needed: fields[0].to_string(),
        location: fields[1].to_string(),
        urgency,
        notes: fields
            .get(3)
            .map(|notes| notes.to_string())
            .unwrap_or(draft.notes),
    }))
}

fn parse_row_number(rest: &str) -> Result<i64, String> {
    rest.parse()
        .map_err(|_| format!("expected a row number, got '{rest}'"))
}

fn print_help() {
    println!(
        "commands:\n  donor | recipient           choose a role\n  login <name>;<phone>;<blood type>;<location>\n  quick <donor|recipient>     demo sign-in\n  map | back                  open the map / return\n  emergency                   open the emergency form (recipient)\n  send                        1-click request with the pre-filled draft\n  send <units>;<location>;<urgency>[;<notes>]\n  dismiss                     cancel the form / leave the success screen\n  respond <n> | contact <n>   act on a feed row\n  signout | quit"
    );
}

fn print_screen(session: &CoordinationSession) {
    println!();
    match session.active_view() {
        ViewState::Auth => {
            println!("== Blood Connect ==");
            println!("Saving lives, one donation at a time");
            match session.pending_role() {
                Some(role) => println!("Role: {} (fill the sign-in form)", role.label()),
                None => println!("Choose a role: 'donor' or 'recipient'"),
            }
        }
        ViewState::DonorDashboard => print_donor_dashboard(session),
        ViewState::RecipientDashboard => print_recipient_dashboard(session),
        ViewState::Map => print_map(session),
        ViewState::EmergencyForm => print_emergency_form(session),
        ViewState::EmergencyProcessing => {
            println!("== Processing Emergency Request ==");
            println!("Broadcasting your request to nearby donors...");
        }
        ViewState::EmergencySuccess => print_emergency_success(session),
    }
}

fn print_donor_dashboard(session: &CoordinationSession) {
    let Some(profile) = session.profile() else {
        return;
    };
    let feeds = session.feeds();
    println!("== Donor Dashboard ==");
    println!(
        "[{}] Welcome, {}  ({} {})",
        profile.initials(),
        profile.name,
        profile.blood_type,
        profile.role.badge_noun()
    );
    let stats = feeds.donor_stats;
    println!(
        "donations: {}  badges: {}  days until eligible: {}  lives saved: {}",
        stats.total_donations, stats.badges_earned, stats.days_until_eligible, stats.lives_saved
    );
    println!("Nearby Blood Requests:");
    for request in &feeds.nearby_requests {
        println!(
            "  [{}] {} at {} - {:.1} km, {} min ago ({})",
            request.id.0,
            request.blood_type,
            request.location,
            request.distance_km,
            request.minutes_ago,
            request.urgency
        );
    }
    println!("Notifications ({}):", feeds.notification_count);
    for notification in &feeds.notifications {
        println!("  - {} ({})", notification.message, notification.age);
    }
}

fn print_recipient_dashboard(session: &CoordinationSession) {
    let Some(profile) = session.profile() else {
        return;
    };
    let feeds = session.feeds();
    println!("== Recipient Dashboard ==");
    println!(
        "[{}] Welcome, {}  ({} {})",
        profile.initials(),
        profile.name,
        profile.blood_type,
        profile.role.badge_noun()
    );
    let active = &feeds.active_request;
    println!(
        "Active request: {} at {} - posted {} min ago, {} responses ({})",
        profile.blood_type, active.location, active.minutes_ago, active.responses, active.urgency
    );
    println!("Donor responses:");
    for donor in &feeds.donor_responses {
        println!(
            "  [{}] {} {} - {:.1} km, ETA {} min{}",
            donor.id.0,
            donor.name,
            donor.blood_type,
            donor.distance_km,
            donor.eta_minutes,
            if donor.verified { " (verified)" } else { "" }
        );
    }
    println!("'emergency' opens the emergency request form");
}

fn print_map(session: &CoordinationSession) {
    let feeds = session.feeds();
    println!("== Blood Map ==");
    println!("Donors:");
    for donor in &feeds.map_donors {
        println!(
            "  {} ({}) - {:.1} km, {}",
            donor.name,
            donor.blood_type,
            donor.distance_km,
            donor.availability.label()
        );
    }
    println!("Blood banks:");
    for bank in &feeds.blood_banks {
        println!(
            "  {} at {} - stock {}, {:.1} km",
            bank.name,
            bank.address,
            bank.stock.label(),
            bank.distance_km
        );
    }
    println!("Emergency requests:");
    for request in &feeds.map_emergencies {
        println!(
            "  {} at {} - {} ({} min ago)",
            request.blood_type, request.location, request.urgency, request.minutes_ago
        );
    }
    println!("'back' returns to your dashboard");
}

fn print_emergency_form(session: &CoordinationSession) {
    println!("== Emergency Blood Request ==");
    let Some(form) = session.emergency().form() else {
        return;
    };
    println!("blood type: {} (from your profile)", form.blood_type);
    println!("units needed: {}", form.units_needed);
    println!("location: {}", form.location);
    println!("urgency: {}", form.urgency);
    println!("notes: {}", form.notes);
    println!("'send' broadcasts the draft; 'send u;loc;urgency[;notes]' customizes; 'dismiss' cancels");
}

fn print_emergency_success(session: &CoordinationSession) {
    println!("== Emergency Request Sent! ==");
    let Some(request) = session.emergency().request() else {
        return;
    };
    let Some(summary) = session.emergency().summary() else {
        return;
    };
    println!(
        "Your request has been broadcast to {} nearby donors and {} blood banks.",
        summary.donors_notified, summary.blood_banks_contacted
    );
    println!(
        "blood type: {}  units: {}  location: {}  urgency: {}",
        request.blood_type, request.units_needed, request.location, request.urgency
    );
    println!(
        "responses received: {}  estimated response time: {}-{} min",
        summary.responses_received,
        summary.estimated_response_minutes.0,
        summary.estimated_response_minutes.1
    );
    println!("'dismiss' returns to your dashboard");
}
