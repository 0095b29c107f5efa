use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use booking_client::{
    RegisterOutcome, RegisterRequest, Role, Session, SessionManager, TourSchedule,
    evaluate_availability,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=debug", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let manager = SessionManager::from_env()?;

    match args.iter().map(String::as_str).collect::<Vec<_>>().as_slice() {
        ["status"] => {
            manager.initialize().await;
            print_session(&manager.current());
        }
        ["login", email, password] => {
            match manager.login(email, password).await {
                Ok(()) => print_session(&manager.current()),
                Err(e) => eprintln!("Login failed: {}", e.user_message()),
            }
        }
        ["admin-login", email, password] => {
            match manager.admin_login(email, password).await {
                Ok(()) => print_session(&manager.current()),
                Err(e) => eprintln!("Admin login failed: {}", e.user_message()),
            }
        }
        ["register", first_name, last_name, email, username, phone, password] => {
            let request = RegisterRequest {
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                username: username.to_string(),
                phone: phone.to_string(),
                password: password.to_string(),
                password_confirm: password.to_string(),
                role: Role::User,
            };
            match manager.register(request).await {
                Ok(RegisterOutcome::SignedIn) => {
                    println!("Registered and signed in.");
                    print_session(&manager.current());
                }
                Ok(RegisterOutcome::RegisteredOnly) => {
                    println!("Registered. Please sign in.");
                }
                Err(e) => eprintln!("Registration failed: {}", e.user_message()),
            }
        }
        ["logout"] => {
            manager.initialize().await;
            manager.logout().await;
            println!("Signed out.");
        }
        ["availability", file] => {
            let raw = std::fs::read_to_string(file)?;
            let tour: TourSchedule = serde_json::from_str(&raw)?;
            let result = evaluate_availability(&tour);
            println!("{}", result.message);
            if let Some(next) = result.next_available_date {
                println!("Next available date: {next}");
            }
        }
        _ => {
            eprintln!("Usage:");
            eprintln!("  demo-cli status");
            eprintln!("  demo-cli login <email> <password>");
            eprintln!("  demo-cli admin-login <email> <password>");
            eprintln!("  demo-cli register <first> <last> <email> <username> <phone> <password>");
            eprintln!("  demo-cli logout");
            eprintln!("  demo-cli availability <tour.json>");
        }
    }

    Ok(())
}

fn print_session(session: &Session) {
    if session.is_authenticated {
        let who = session
            .user
            .as_ref()
            .map(|u| u.username.as_str())
            .unwrap_or("<profile pending>");
        let role = session
            .role
            .map(|r| r.to_string())
            .unwrap_or_else(|| "unknown".to_string());
        println!("Signed in as {who} (role: {role})");
    } else {
        println!("Not signed in.");
    }
}
