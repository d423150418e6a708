//! Naming rules of the analyzed language.

use super::constants::BLANK_IDENTIFIER;

/// A name is exported when its first character is an uppercase letter.
pub fn is_exported(name: &str) -> bool {
    name.chars().next().is_some_and(char::is_uppercase)
}

/// Check that `name` is a single identifier (letter or `_` followed by
/// letters, digits or `_`).
pub fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first == '_' || unicode_ident::is_xid_start(first) => {}
        _ => return false,
    }
    chars.all(unicode_ident::is_xid_continue)
}

/// The blank identifier declares nothing.
pub fn is_blank(name: &str) -> bool {
    name == BLANK_IDENTIFIER
}

/// Strip pointer markers, package qualifiers and type arguments from a
/// receiver or embedded type expression: `*pkg.Box[T]` becomes `Box`.
pub fn receiver_base_name(receiver: &str) -> &str {
    let trimmed = receiver.trim().trim_start_matches('*').trim();
    let without_args = match trimmed.find('[') {
        Some(idx) => &trimmed[..idx],
        None => trimmed,
    };
    match without_args.rfind('.') {
        Some(idx) => &without_args[idx + 1..],
        None => without_args,
    }
    .trim()
}

/// The name an import is referred to by inside a file: the alias when
/// present, otherwise the last path segment, skipping a `/vN` major version
/// suffix (`example.com/lib/v2` is `lib`).
pub fn import_local_name<'a>(path: &'a str, alias: Option<&'a str>) -> &'a str {
    if let Some(alias) = alias {
        return alias;
    }
    let mut segments = path.rsplit('/');
    let last = segments.next().unwrap_or(path);
    if is_major_version(last) {
        segments.next().unwrap_or(last)
    } else {
        last
    }
}

fn is_major_version(segment: &str) -> bool {
    segment
        .strip_prefix('v')
        .is_some_and(|rest| !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()))
}
