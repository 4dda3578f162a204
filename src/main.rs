use clap::Parser;
use give_and_get::{cli, client, config, error, prompts, render, survey};
use cli::{Cli, Commands, MatchTarget, SearchArea};
use config::Config;
use error::{AppError, Result};
use give_and_get_common::{
    ApiClient, ApiError, ApiTransport, Coordinate, DonationList, DonorForm, LocationSet, MatchSession,
    OrganizationForm, QueryOutcome, QueryTicket, SubmitStatus, Submission,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    let mut config = Config::load()?;
    let api_url = cli.api_url.as_deref();

    match cli.command {
        Commands::Donor { precheck } => {
            println!("🤝 Give & Get - donor sign up\n");
            let api = client::build_client(&config, api_url)?;

            let mut submission = Submission::new(DonorForm::new());
            prompts::fill_donor(submission.form_mut())?;

            if precheck {
                let pb = render::spinner("Checking contact details...");
                let checked = api.validate_donor(&submission.form().validation_request()).await;
                pb.finish_and_clear();
                let reply = checked?;
                println!("✔ {}", reply.message);
                if let Some(verification) = &reply.verification {
                    print!("{}", render::verification(verification));
                }
            }

            let pb = render::spinner("Creating account...");
            submission
                .submit(|payload| {
                    let api = &api;
                    async move { api.create_user(&payload).await }
                })
                .await;
            pb.finish_and_clear();
            finish_submission(submission.status())?;
        }

        Commands::Org => {
            println!("🏠 Give & Get - organization registration\n");
            let api = client::build_client(&config, api_url)?;

            let mut submission = Submission::new(OrganizationForm::new());
            prompts::fill_organization(submission.form_mut())?;

            let pb = render::spinner("Registering and verifying...");
            submission
                .submit(|payload| {
                    let api = &api;
                    async move { api.validate_organization(&payload).await }
                })
                .await;
            pb.finish_and_clear();
            finish_submission(submission.status())?;
        }

        Commands::Match { target } => {
            let api = client::build_client(&config, api_url)?;
            match target {
                MatchTarget::Supplies { area, items } => {
                    println!("📦 Give & Get - where to donate\n");
                    let mut session = MatchSession::for_donor();
                    prepare_session(&mut session, &area);

                    let mut donations = DonationList::new();
                    for draft in items {
                        donations.add(draft);
                    }
                    for item in donations.items() {
                        println!("  • {} x{} ({})", item.item_name, item.quantity, item.category);
                    }

                    let request = session.supply_request(&donations);
                    let ticket = session.begin_query();
                    let pb = render::spinner("Searching...");
                    let result = api.match_supplies(&request).await;
                    pb.finish_and_clear();
                    apply_results(&mut session, ticket, result, area.select.as_deref())?;
                }
                MatchTarget::People { area, survey: file, answers } => {
                    println!("🛏  Give & Get - get help\n");
                    let mut session = MatchSession::for_people();
                    prepare_session(&mut session, &area);

                    let form = survey::build_survey(file.as_deref(), &answers)?;
                    let request = session.people_request(&form);
                    let ticket = session.begin_query();
                    let pb = render::spinner("Searching...");
                    let result = api.match_people(&request).await;
                    pb.finish_and_clear();
                    apply_results(&mut session, ticket, result, area.select.as_deref())?;
                }
            }
        }

        Commands::About => {
            let api = client::build_client(&config, api_url)?;
            let pb = render::spinner("Loading...");
            let content = api.about().await;
            pb.finish_and_clear();
            print!("{}", render::about(&content));
        }

        Commands::Health => {
            let api = client::build_client(&config, api_url)?;
            health(&api).await?;
        }

        Commands::Config { set_api_url, set_maps_key, show } => {
            if let Some(url) = set_api_url {
                config.set_api_url(url)?;
                println!("✔ API URL saved");
            }

            if let Some(key) = set_maps_key {
                config.set_maps_key(key)?;
                println!("✔ Maps API key saved");
            }

            if show {
                let resolved = config.client_config(api_url);
                println!("Config file: {}", Config::config_path()?.display());
                println!("API URL: {}", resolved.api_url);
                println!(
                    "Maps API key: {}",
                    if resolved.maps_api_key.is_some() { "set" } else { "not set" }
                );
                println!("Timeout: {}s", config.timeout_seconds);
            }
        }
    }

    Ok(())
}

/// 出発地と半径をセッションに反映（座標未指定なら既定地点）
fn prepare_session(session: &mut MatchSession, area: &SearchArea) {
    match (area.lat, area.lng) {
        (Some(lat), Some(lng)) => {
            if !session.set_origin(Coordinate::new(lat, lng)) {
                println!("⚠ Invalid coordinates, using the default location");
            }
        }
        _ => log::info!("no origin given, using default location"),
    }
    if let Some(radius) = area.radius {
        session.set_radius(radius);
    }
    let origin = session.origin();
    println!("Searching within {} mi of ({:.4}, {:.4})", session.radius(), origin.lat, origin.lng);
}

fn apply_results(
    session: &mut MatchSession,
    ticket: QueryTicket,
    result: std::result::Result<LocationSet, ApiError>,
    select: Option<&str>,
) -> Result<()> {
    match session.finish_query(ticket, result) {
        QueryOutcome::Applied(count) => println!("✔ {} organizations found\n", count),
        QueryOutcome::Stale => return Ok(()),
        QueryOutcome::Failed(message) => return Err(AppError::Match(message)),
    }
    println!("{}", render::location_list(session.results()));

    if let Some(id) = select {
        if !session.select(id) {
            return Err(AppError::UnknownLocation(id.to_string()));
        }
        if let Some(entry) = session.selected_entry() {
            println!("\n{}", render::location_detail(entry));
        }
    }
    Ok(())
}

fn finish_submission(status: &SubmitStatus) -> Result<()> {
    match status {
        SubmitStatus::Succeeded { echo, receipt } => {
            println!("✅ Registration complete");
            print!("{}", render::receipt(echo, receipt));
            Ok(())
        }
        SubmitStatus::Rejected(message) => Err(ApiError::Rejected(message.clone()).into()),
        SubmitStatus::Failed(message) => Err(AppError::Submit(message.clone())),
        SubmitStatus::Editing | SubmitStatus::Submitting => Err(AppError::Submit("Submission did not complete".into())),
    }
}

async fn health<T: ApiTransport>(api: &ApiClient<T>) -> Result<()> {
    let pb = render::spinner("Checking backend...");
    let reply = api.health().await;
    pb.finish_and_clear();
    let reply = reply?;
    println!("✔ {} ({}) {}", reply.status, api.base_url(), reply.api_version);
    if !reply.message.is_empty() {
        println!("{}", reply.message);
    }
    Ok(())
}
