use clap::Subcommand;
use serde_json::json;

use crate::cli::config::Context;
use crate::cli::utils::{output_record, output_success, read_secret};
use crate::session::{self, restricted_view, role_of, GuardOutcome, SessionGuard};

#[derive(Subcommand)]
pub enum AuthCommands {
    #[command(about = "Sign in with mobile number and MPIN")]
    Login {
        #[arg(help = "10 digit mobile number")]
        mobile: String,
        #[arg(long, help = "MPIN (falls back to KAB_MPIN, then a prompt)")]
        mpin: Option<String>,
    },

    #[command(about = "Forget the stored session")]
    Logout,

    #[command(about = "Show the stored session and whether it passes the role check")]
    Status,
}

pub async fn handle(cmd: AuthCommands, ctx: &Context) -> anyhow::Result<()> {
    match cmd {
        AuthCommands::Login { mobile, mpin } => {
            let mpin = read_secret("MPIN", mpin, "KAB_MPIN")?;
            let client = ctx.anonymous_client()?;
            let session = session::login(&client, &ctx.store, mobile.trim(), mpin.trim()).await?;

            let guard = SessionGuard::from_config(ctx.config);
            let role = role_of(&session).unwrap_or_default();
            let authorized = matches!(guard.check(Some(&session)), GuardOutcome::Authorized(_));
            let message = if authorized {
                format!("Signed in as {}", mobile.trim())
            } else {
                format!("Signed in as {}, but the {} role is required for admin commands", mobile.trim(), guard.required_role())
            };
            output_success(&ctx.output, &message, Some(json!({ "role": role, "authorized": authorized })))
        }
        AuthCommands::Logout => {
            session::logout(&ctx.store)?;
            output_success(&ctx.output, "Signed out", None)
        }
        AuthCommands::Status => {
            let guard = SessionGuard::from_config(ctx.config);
            let stored = ctx.current_session()?;
            let status = match (guard.check(stored.as_ref()), stored.as_ref()) {
                (GuardOutcome::Authorized(s), _) => json!({
                    "signedIn": true,
                    "authorized": true,
                    "role": role_of(&s),
                    "savedAt": s.saved_at.to_rfc3339(),
                    "user": s.user().map(restricted_view),
                }),
                (GuardOutcome::Unauthorized(user), Some(s)) => json!({
                    "signedIn": true,
                    "authorized": false,
                    "role": role_of(s),
                    "requiredRole": guard.required_role(),
                    "savedAt": s.saved_at.to_rfc3339(),
                    "user": restricted_view(&user),
                }),
                _ => json!({ "signedIn": false, "authorized": false }),
            };
            output_record(&ctx.output, "session", &status)
        }
    }
}
