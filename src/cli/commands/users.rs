use clap::Subcommand;
use serde_json::{json, Value};

use super::{hard_delete, list_resource, submit, PageArgs};
use crate::api::ApiRequest;
use crate::cli::config::Admin;
use crate::cli::utils::read_secret;
use crate::drawer::forms::UserForm;
use crate::drawer::Drawer;
use crate::resources::USERS;

#[derive(Subcommand)]
pub enum UserCommands {
    #[command(about = "List users")]
    List {
        #[command(flatten)]
        paging: PageArgs,
    },

    #[command(about = "Create a user")]
    Create {
        #[arg(long)]
        mobile: String,
        #[arg(long, help = "Role id")]
        role: String,
        #[arg(long, help = "Language id")]
        language: String,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, help = "4-6 digit MPIN (falls back to KAB_USER_MPIN, then a prompt)")]
        mpin: Option<String>,
    },

    #[command(about = "Update a user; unset flags keep the stored value")]
    Edit {
        id: String,
        #[arg(long)]
        mobile: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
        #[arg(long, help = "Language id")]
        language: Option<String>,
        #[arg(long)]
        device_id: Option<String>,
        #[arg(long)]
        latitude: Option<f64>,
        #[arg(long)]
        longitude: Option<f64>,
        #[arg(long, help = "New MPIN; omit to keep the current one")]
        mpin: Option<String>,
    },

    #[command(about = "Delete a user permanently")]
    Delete {
        id: String,
        #[arg(long, help = "Mobile number, shown in the confirmation")]
        mobile: Option<String>,
        #[arg(long, help = "Email, shown when there is no mobile number")]
        email: Option<String>,
        #[arg(long, short = 'y')]
        yes: bool,
    },
}

async fn find_user(admin: &Admin, id: &str) -> anyhow::Result<Option<Value>> {
    let page = admin.client.fetch_list(ApiRequest::get(USERS.path)).await?;
    Ok(page
        .rows
        .into_iter()
        .find(|u| u.get("id").and_then(Value::as_str) == Some(id)))
}

fn apply(target: &mut String, value: Option<String>) {
    if let Some(v) = value {
        *target = v;
    }
}

pub async fn handle(cmd: UserCommands, admin: &Admin) -> anyhow::Result<()> {
    match cmd {
        UserCommands::List { paging } => {
            let columns = [
                ("ID", "id"),
                ("NAME", "name"),
                ("MOBILE", "mobileNumber"),
                ("EMAIL", "email"),
                ("ROLE", "role"),
                ("LANGUAGE", "language"),
            ];
            list_resource(admin, &USERS, &paging, &columns).await
        }
        UserCommands::Create { mobile, role, language, email, mpin } => {
            let mpin = read_secret("MPIN", mpin, "KAB_USER_MPIN")?;
            let form = UserForm {
                mobile_number: mobile,
                role_id: role,
                language_id: language,
                email: email.unwrap_or_default(),
                mpin,
                ..Default::default()
            };
            submit(admin, Drawer::create(form), "User created").await
        }
        UserCommands::Edit { id, mobile, name, email, language, device_id, latitude, longitude, mpin } => {
            let mut form = match find_user(admin, &id).await? {
                Some(record) => UserForm::from_record(&record),
                None => UserForm::default(),
            };
            apply(&mut form.mobile_number, mobile);
            apply(&mut form.name, name);
            apply(&mut form.email, email);
            apply(&mut form.language_id, language);
            apply(&mut form.device_id, device_id);
            apply(&mut form.latitude, latitude.map(|v| v.to_string()));
            apply(&mut form.longitude, longitude.map(|v| v.to_string()));
            apply(&mut form.mpin, mpin);
            submit(admin, Drawer::edit(id, form), "User updated").await
        }
        UserCommands::Delete { id, mobile, email, yes } => {
            let row = match find_user(admin, &id).await? {
                Some(record) => record,
                None => json!({ "id": id, "mobileNumber": mobile, "email": email }),
            };
            hard_delete(admin, &USERS, row, yes).await
        }
    }
}
