//! `rollout init`

use anyhow::{bail, Result};
use rollout::infrastructure::DescriptorTemplate;
use rollout::presentation::factory::create_cipher;

use super::encrypt::read_secret;
use super::{CommandContext, GlobalFlags};
use crate::ui::json;
use crate::ui::primitives::icon::Icon;
use crate::ui::primitives::text::ColoredText;

/// Arguments of `rollout init`
#[derive(Debug, Clone, Default)]
pub struct InitArgs {
    pub env: String,
    pub host: String,
    pub user: String,
    pub path: Option<String>,
    pub app: Option<String>,
    pub password_stdin: bool,
    pub force: bool,
}

pub fn cmd_init(flags: GlobalFlags, args: InitArgs) -> Result<()> {
    let ctx = CommandContext::load(flags)?;

    let app_name = match args.app {
        Some(app) if !app.trim().is_empty() => app,
        _ => ctx
            .project_root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "app".to_string()),
    };

    let encrypted_password = if args.password_stdin {
        let secret = read_secret(&mut std::io::stdin().lock())?;
        if secret.is_empty() {
            bail!("--password-stdin was given but stdin was empty");
        }
        create_cipher().encrypt(&secret)?
    } else {
        String::new()
    };
    let has_password = !encrypted_password.is_empty();

    let template = DescriptorTemplate {
        environment: args.env,
        host: args.host,
        user: args.user,
        path: args.path,
        app_name,
        encrypted_password,
    };
    let path = ctx.repository().init(&template, args.force)?;

    if ctx.ui.json {
        json::emit(serde_json::json!({
            "event": "created",
            "command": "init",
            "environment": template.environment,
            "path": path.display().to_string(),
            "encrypted_password": has_password,
        }));
        return Ok(());
    }

    let (color, unicode) = (ctx.ui.color, ctx.ui.unicode);
    println!(
        "{} Created {}",
        Icon::Success.colored(color, unicode),
        ColoredText::plain(path.display().to_string())
            .bold()
            .render(color)
    );
    if has_password {
        println!(
            "{} Password stored encrypted for this machine and user",
            Icon::Lock.colored(color, unicode)
        );
    }
    if template.host.is_empty() || template.user.is_empty() {
        println!(
            "{} {}",
            Icon::Arrow.colored(color, unicode),
            ColoredText::dim("Fill in server.host and server.user before deploying").render(color)
        );
    }
    Ok(())
}
