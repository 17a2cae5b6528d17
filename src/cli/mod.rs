pub mod commands;
pub mod config;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use self::config::Context;

#[derive(Parser)]
#[command(name = "kab")]
#[command(about = "Kaburlu admin - manage tenants, locations, users and settings from the terminal")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Sign in, sign out and session status")]
    Auth {
        #[command(subcommand)]
        cmd: commands::auth::AuthCommands,
    },

    #[command(about = "States")]
    States {
        #[command(subcommand)]
        cmd: commands::states::StateCommands,
    },

    #[command(about = "Districts, filtered by state")]
    Districts {
        #[command(subcommand)]
        cmd: commands::districts::DistrictCommands,
    },

    #[command(about = "Assembly constituencies, filtered by district")]
    Assembly {
        #[command(subcommand)]
        cmd: commands::assembly::AssemblyCommands,
    },

    #[command(about = "Mandals, filtered by district")]
    Mandals {
        #[command(subcommand)]
        cmd: commands::mandals::MandalCommands,
    },

    #[command(about = "Languages")]
    Languages {
        #[command(subcommand)]
        cmd: commands::languages::LanguageCommands,
    },

    #[command(about = "News categories per language")]
    Categories {
        #[command(subcommand)]
        cmd: commands::categories::CategoryCommands,
    },

    #[command(about = "Tenants and publisher entities")]
    Tenants {
        #[command(subcommand)]
        cmd: commands::tenants::TenantCommands,
    },

    #[command(about = "Tenant domains and verification")]
    Domains {
        #[command(subcommand)]
        cmd: commands::domains::DomainCommands,
    },

    #[command(about = "Per-domain website settings")]
    Settings {
        #[command(subcommand)]
        cmd: commands::settings::SettingsCommands,
    },

    #[command(about = "Razorpay payment keys")]
    Razorpay {
        #[command(subcommand)]
        cmd: commands::razorpay::RazorpayCommands,
    },

    #[command(about = "Reporter ID card settings")]
    Idcard {
        #[command(subcommand)]
        cmd: commands::idcard::IdCardCommands,
    },

    #[command(about = "Roles and permissions")]
    Roles {
        #[command(subcommand)]
        cmd: commands::roles::RoleCommands,
    },

    #[command(about = "Users")]
    Users {
        #[command(subcommand)]
        cmd: commands::users::UserCommands,
    },

    #[command(about = "Tenant reporters")]
    Reporters {
        #[command(subcommand)]
        cmd: commands::reporters::ReporterCommands,
    },

    #[command(about = "Media uploads")]
    Media {
        #[command(subcommand)]
        cmd: commands::media::MediaCommands,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);
    let ctx = Context::new(crate::config::config(), output_format)?;

    if let Commands::Auth { cmd } = cli.command {
        return commands::auth::handle(cmd, &ctx).await;
    }

    let admin = ctx.authorize()?;
    match cli.command {
        Commands::Auth { .. } => Ok(()),
        Commands::States { cmd } => commands::states::handle(cmd, &admin).await,
        Commands::Districts { cmd } => commands::districts::handle(cmd, &admin).await,
        Commands::Assembly { cmd } => commands::assembly::handle(cmd, &admin).await,
        Commands::Mandals { cmd } => commands::mandals::handle(cmd, &admin).await,
        Commands::Languages { cmd } => commands::languages::handle(cmd, &admin).await,
        Commands::Categories { cmd } => commands::categories::handle(cmd, &admin).await,
        Commands::Tenants { cmd } => commands::tenants::handle(cmd, &admin).await,
        Commands::Domains { cmd } => commands::domains::handle(cmd, &admin).await,
        Commands::Settings { cmd } => commands::settings::handle(cmd, &admin).await,
        Commands::Razorpay { cmd } => commands::razorpay::handle(cmd, &admin).await,
        Commands::Idcard { cmd } => commands::idcard::handle(cmd, &admin).await,
        Commands::Roles { cmd } => commands::roles::handle(cmd, &admin).await,
        Commands::Users { cmd } => commands::users::handle(cmd, &admin).await,
        Commands::Reporters { cmd } => commands::reporters::handle(cmd, &admin).await,
        Commands::Media { cmd } => commands::media::handle(cmd, &admin).await,
    }
}
