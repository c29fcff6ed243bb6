//! Help text generation from the command catalog and name index.

use chatcmd_types::messages::{MessageCatalog, Msg};

use crate::catalog::{CommandId, ContextFlags};
use crate::names::names_for;

/// List every documented command whose flags intersect `filter` and do not
/// intersect `exclude`, in identifier order.
///
/// Each line reads `/name usage\tdescription (aliases: ...)`.
pub fn build_help(
    filter: ContextFlags,
    exclude: ContextFlags,
    catalog: &dyn MessageCatalog,
    mark_aliases: bool,
) -> String {
    let mut out = String::new();
    for id in CommandId::ALL {
        let desc = id.descriptor();
        let Some(key) = desc.help else { continue };
        if !desc.flags.intersects(filter) || desc.flags.intersects(exclude) {
            continue;
        }
        let names = names_for(id);
        let Some(display) = names.first() else { continue };

        let text = catalog.text(key);
        let mut help: &str = &text;
        let both = ContextFlags::HUB | ContextFlags::USER;
        if desc.flags.contains(both)
            && let Some((hub, user)) = help.split_once('\n')
        {
            help = if filter == ContextFlags::HUB { hub } else { user };
        }

        out.push('/');
        out.push_str(display);
        if let Some((usage, rest)) = help.split_once('\t') {
            out.push(' ');
            out.push_str(usage);
            help = rest;
        }
        out.push('\t');
        out.push_str(help);
        if names.len() > 1 {
            let aliases = names[1..]
                .iter()
                .map(|n| {
                    if mark_aliases {
                        format!("*/{n}*")
                    } else {
                        format!("/{n}")
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            out.push(' ');
            out.push_str(&catalog.format(Msg::Aliases, &aliases));
        }
        out.push('\n');
    }
    out
}

/// Full help: general chat, hub, user, and system sections.
pub fn help_text(catalog: &dyn MessageCatalog, mark_aliases: bool) -> String {
    let sections = [
        (Msg::TitleGeneralChat, ContextFlags::GENERAL_CHAT, ContextFlags::empty()),
        (Msg::TitleHub, ContextFlags::HUB, ContextFlags::GENERAL_CHAT),
        (Msg::TitleUser, ContextFlags::USER, ContextFlags::GENERAL_CHAT),
        (Msg::TitleSystem, ContextFlags::SYSTEM, ContextFlags::GENERAL_CHAT),
    ];
    let mut out = String::new();
    for (i, (title, filter, exclude)) in sections.into_iter().enumerate() {
        if i > 0 {
            out.push('\n');
        }
        out.push_str(&catalog.text(title));
        out.push('\n');
        out.push_str(&build_help(filter, exclude, catalog, mark_aliases));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use chatcmd_types::messages::DefaultCatalog;

    fn section(filter: ContextFlags, exclude: ContextFlags) -> String {
        build_help(filter, exclude, &DefaultCatalog, false)
    }

    fn line_for<'a>(text: &'a str, prefix: &str) -> &'a str {
        text.lines()
            .find(|l| l.starts_with(prefix))
            .unwrap_or_else(|| panic!("no line starting with {prefix:?} in\n{text}"))
    }

    #[test]
    fn longest_alias_leads_slots_line() {
        let text = section(ContextFlags::SYSTEM, ContextFlags::GENERAL_CHAT);
        assert_eq!(
            line_for(&text, "/slots"),
            "/slots <n>\tSet the number of upload slots (aliases: /sl)"
        );
    }

    #[test]
    fn canonical_alias_leads_media_player() {
        let text = section(ContextFlags::GENERAL_CHAT, ContextFlags::empty());
        let line = line_for(&text, "/winamp");
        assert!(line.contains("(aliases: /foobar, /itunes"), "{line}");
    }

    #[test]
    fn hub_and_user_variants() {
        let hub = section(ContextFlags::HUB, ContextFlags::GENERAL_CHAT);
        let user = section(ContextFlags::USER, ContextFlags::GENERAL_CHAT);
        assert!(line_for(&hub, "/favorite").contains("Add this hub to favorites"));
        assert!(line_for(&user, "/favorite").contains("Add this user to favorites"));
        assert_eq!(
            line_for(&hub, "/getlist"),
            "/getlist <nick>\tGet a user's file list (aliases: /gl)"
        );
        assert_eq!(
            line_for(&user, "/getlist"),
            "/getlist\tGet this user's file list (aliases: /gl)"
        );
    }

    #[test]
    fn hidden_commands_are_omitted() {
        let text = section(ContextFlags::SYSTEM, ContextFlags::empty());
        assert!(!text.contains("/dht"));
        assert!(!text.contains("/tth"));
        assert!(!text.contains("/divide"));
    }

    #[test]
    fn general_chat_excluded_from_other_sections() {
        let text = section(ContextFlags::SYSTEM, ContextFlags::GENERAL_CHAT);
        assert!(!text.contains("/version"));
        let general = section(ContextFlags::GENERAL_CHAT, ContextFlags::empty());
        assert!(general.contains("/version [pub]\tShow the client version (aliases: /ver)"));
    }

    #[test]
    fn identifier_order_is_kept() {
        let text = section(ContextFlags::GENERAL_CHAT, ContextFlags::empty());
        let clear = text.find("/clear").unwrap();
        let help = text.find("/help").unwrap();
        assert!(clear < help);
    }

    #[test]
    fn marked_aliases() {
        let text = build_help(ContextFlags::SYSTEM, ContextFlags::GENERAL_CHAT, &DefaultCatalog, true);
        assert!(line_for(&text, "/slots").ends_with("(aliases: */sl*)"));
    }

    #[test]
    fn full_help_has_four_sections() {
        let text = help_text(&DefaultCatalog, false);
        let titles = [
            "General chat commands:",
            "Hub commands:",
            "Private chat commands:",
            "System commands:",
        ];
        let mut last = 0;
        for title in titles {
            let pos = text.find(title).unwrap();
            assert!(pos >= last, "{title} out of order");
            last = pos;
        }
        assert!(text.starts_with("General chat commands:\n/clear"));
    }
}
