//! Installed applications and the models they register.

use pollme_core::catalog::{AppConfig, AppRegistry, FieldDef, FieldKind, ModelDef};

/// Framework and first-party apps in installation order.
pub const INSTALLED_APPS: [&str; 9] = [
    "contrib.admin",
    "contrib.auth",
    "contrib.contenttypes",
    "contrib.sessions",
    "contrib.messages",
    "contrib.staticfiles",
    "pollme.apps.accounts",
    "pollme.apps.polls",
    "pollme.apps.core",
];

/// Build the registry of every installed app, with reverse relations.
pub fn installed_apps() -> Result<AppRegistry, pollme_core::Error> {
    let mut registry = AppRegistry::new();
    for full_name in INSTALLED_APPS {
        registry.register(app_config(full_name))?;
    }
    registry.populate_reverse_relations()?;
    Ok(registry)
}

fn app_config(full_name: &str) -> AppConfig {
    let app = AppConfig::new(full_name);
    match full_name {
        "contrib.admin" => app.with_model(log_entry()),
        "contrib.auth" => app
            .with_model(permission())
            .with_model(group())
            .with_model(user()),
        "contrib.contenttypes" => app.with_model(content_type()),
        "contrib.sessions" => app.with_model(session()),
        "pollme.apps.polls" => app
            .with_model(poll())
            .with_model(choice())
            .with_model(vote())
            .with_model(genre())
            .with_model(sample_data())
            .with_model(sample_data_mptt()),
        _ => app,
    }
}

fn char_field(name: &str) -> FieldDef {
    FieldDef::new(name, FieldKind::CharField)
}

fn datetime_field(name: &str) -> FieldDef {
    FieldDef::new(name, FieldKind::DateTimeField)
}

fn bool_field(name: &str) -> FieldDef {
    FieldDef::new(name, FieldKind::BooleanField)
}

/// Bookkeeping columns of a nested-set tree node.
fn tree_fields() -> [FieldDef; 4] {
    ["lft", "rght", "tree_id", "level"].map(|name| FieldDef::new(name, FieldKind::PositiveIntegerField))
}

// ========== Framework apps ==========

fn log_entry() -> ModelDef {
    ModelDef::new("LogEntry")
        .with_doc("An admin action on an object.")
        .with_db_table("admin_log")
        .with_field(FieldDef::auto_id())
        .with_field(datetime_field("action_time"))
        .with_field(FieldDef::foreign_key("user", "auth", "User"))
        .with_field(FieldDef::foreign_key("content_type", "contenttypes", "ContentType"))
        .with_field(FieldDef::new("object_id", FieldKind::TextField))
        .with_field(char_field("object_repr"))
        .with_field(FieldDef::new("action_flag", FieldKind::PositiveIntegerField))
        .with_field(FieldDef::new("change_message", FieldKind::TextField))
}

fn permission() -> ModelDef {
    ModelDef::new("Permission")
        .with_doc("A named permission on a content type.")
        .with_field(FieldDef::auto_id())
        .with_field(char_field("name"))
        .with_field(FieldDef::foreign_key("content_type", "contenttypes", "ContentType"))
        .with_field(char_field("codename"))
}

fn group() -> ModelDef {
    ModelDef::new("Group")
        .with_field(FieldDef::auto_id())
        .with_field(char_field("name"))
        .with_field(FieldDef::related(
            "permissions",
            FieldKind::ManyToManyField,
            "auth",
            "Permission",
        ))
}

fn user() -> ModelDef {
    ModelDef::new("User")
        .with_doc("A registered account. Username and password are required.")
        .with_field(FieldDef::auto_id())
        .with_field(char_field("password"))
        .with_field(datetime_field("last_login"))
        .with_field(bool_field("is_superuser"))
        .with_field(char_field("username"))
        .with_field(char_field("first_name"))
        .with_field(char_field("last_name"))
        .with_field(char_field("email"))
        .with_field(bool_field("is_staff"))
        .with_field(bool_field("is_active"))
        .with_field(datetime_field("date_joined"))
        .with_field(
            FieldDef::related("groups", FieldKind::ManyToManyField, "auth", "Group")
                .with_related_name("user_set"),
        )
        .with_field(
            FieldDef::related("user_permissions", FieldKind::ManyToManyField, "auth", "Permission")
                .with_related_name("user_set"),
        )
}

fn content_type() -> ModelDef {
    ModelDef::new("ContentType")
        .with_field(FieldDef::auto_id())
        .with_field(char_field("app_label"))
        .with_field(char_field("model"))
}

fn session() -> ModelDef {
    ModelDef::new("Session")
        .with_field(char_field("session_key").primary_key())
        .with_field(FieldDef::new("session_data", FieldKind::TextField))
        .with_field(datetime_field("expire_date"))
}

// ========== Polls ==========

fn poll() -> ModelDef {
    ModelDef::new("Poll")
        .with_field(FieldDef::auto_id())
        .with_field(FieldDef::foreign_key("owner", "auth", "User"))
        .with_field(FieldDef::new("text", FieldKind::TextField))
        .with_field(datetime_field("pub_date"))
        .with_field(bool_field("active"))
}

fn choice() -> ModelDef {
    ModelDef::new("Choice")
        .with_field(FieldDef::auto_id())
        .with_field(FieldDef::foreign_key("poll", "polls", "Poll"))
        .with_field(char_field("choice_text"))
}

fn vote() -> ModelDef {
    ModelDef::new("Vote")
        .with_field(FieldDef::auto_id())
        .with_field(FieldDef::foreign_key("user", "auth", "User"))
        .with_field(FieldDef::foreign_key("poll", "polls", "Poll"))
        .with_field(FieldDef::foreign_key("choice", "polls", "Choice"))
}

fn genre() -> ModelDef {
    ModelDef::new("Genre")
        .with_field(FieldDef::auto_id())
        .with_field(char_field("name"))
        .with_field(FieldDef::foreign_key("parent", "polls", "Genre").with_related_name("children"))
        .with_fields(tree_fields())
}

fn sample_data() -> ModelDef {
    let measures = [
        "nsv_cal",
        "list_price_cal",
        "list_price_cal_new",
        "list_price_cal_per_change_ip",
        "base_price_cal",
        "base_price_cal_new",
        "base_price_cal_per_change_ip",
        "aup_cal",
        "aup_cal_new",
    ];

    ModelDef::new("SampleData")
        .with_field(FieldDef::new("pk_id", FieldKind::AutoField).primary_key())
        .with_field(FieldDef::new("product_id", FieldKind::IntegerField))
        .with_field(FieldDef::new("market_id", FieldKind::IntegerField))
        .with_field(char_field("ppg"))
        .with_field(char_field("retailer"))
        .with_fields(measures.map(|name| FieldDef::new(name, FieldKind::FloatField)))
}

fn sample_data_mptt() -> ModelDef {
    ModelDef::new("SampleDataMptt")
        .with_field(FieldDef::auto_id())
        .with_field(FieldDef::foreign_key("datarow", "polls", "SampleData"))
        .with_field(FieldDef::foreign_key("parent", "polls", "SampleDataMptt").with_related_name("children"))
        .with_fields(tree_fields())
}
