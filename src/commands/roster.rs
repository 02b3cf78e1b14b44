use crate::cli::{AdminAction, VipAction};
use crate::commands::{Console, Output};
use crate::error::Result;
use crate::filters::PlayerFilter;
use crate::gameplay::GameplayPanel;
use crate::roster::{RosterEntry, RosterList};

fn render(title: &str, entries: &[&RosterEntry], total: usize) -> String {
    let heading = if entries.len() == total {
        format!("{title} ({total})")
    } else {
        format!("{title} (Showing: {} / {total})", entries.len())
    };
    let mut lines = vec![heading];
    for e in entries {
        let mut line = format!("  {:<17}  {}", e.steam_id_64, e.name);
        if let Some(ref role) = e.role {
            line.push_str(&format!("  [{role}]"));
        }
        lines.push(line);
    }
    lines.join("\n")
}

fn emit_list(out: Output, list: &RosterList, filter: &PlayerFilter) {
    let all = list.entries();
    let shown = filter.select(all, |e| e.name.as_str());
    out.emit(&shown, || render(list.kind().title(), &shown, all.len()));
}

pub async fn run_vip(action: VipAction, console: &Console, out: Output) -> Result<()> {
    let mut page = GameplayPanel::new();
    page.expand_vips(console).await?;

    let mut filter = PlayerFilter::default();
    match action {
        VipAction::List(args) => filter = args.into(),
        VipAction::Add { steam_id_64, name } => page.add_vip(console, &name, &steam_id_64).await?,
        VipAction::Remove { steam_id_64 } => page.vips.remove(console, &steam_id_64).await?,
    }
    emit_list(out, &page.vips, &filter);
    Ok(())
}

pub async fn run_admin(action: AdminAction, console: &Console, out: Output) -> Result<()> {
    let mut page = GameplayPanel::new();

    let mut filter = PlayerFilter::default();
    match action {
        AdminAction::Roles => {
            page.mount(console).await?;
            let roles = page.admin_roles();
            out.emit(&roles, || roles.join("\n"));
            return Ok(());
        }
        AdminAction::List(args) => {
            filter = args.into();
            page.expand_admins(console).await?;
        }
        AdminAction::Add {
            steam_id_64,
            role,
            name,
        } => {
            page.mount(console).await?;
            page.expand_admins(console).await?;
            page.add_admin(console, &name, &steam_id_64, &role).await?;
        }
        AdminAction::Remove { steam_id_64 } => {
            page.expand_admins(console).await?;
            page.admins.remove(console, &steam_id_64).await?;
        }
    }
    emit_list(out, &page.admins, &filter);
    Ok(())
}
