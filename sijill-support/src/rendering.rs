//! Text rendering for human-friendly diagnostics.
//!
//! Formats resolution chains, shortens fully qualified type names and
//! produces "did you mean" suggestions for unregistered keys.

/// Renders a resolution chain as a single line.
///
/// # Examples
/// ```
/// use sijill_support::rendering::render_chain;
///
/// let chain = vec!["OrderService", "PaymentGateway", "OrderService"];
/// assert_eq!(render_chain(&chain), "OrderService → PaymentGateway → OrderService");
/// ```
pub fn render_chain(chain: &[impl AsRef<str>]) -> String {
    chain
        .iter()
        .map(|s| s.as_ref())
        .collect::<Vec<_>>()
        .join(" → ")
}

/// Strips module paths from a type name, keeping generics readable.
///
/// ```
/// use sijill_support::rendering::shorten_type_name;
///
/// assert_eq!(shorten_type_name("shop::billing::Invoice"), "Invoice");
/// assert_eq!(shorten_type_name("dyn shop::mail::Mailer"), "dyn Mailer");
/// assert_eq!(
///     shorten_type_name("alloc::sync::Arc<dyn shop::mail::Mailer>"),
///     "Arc<dyn Mailer>"
/// );
/// ```
pub fn shorten_type_name(full_name: &str) -> String {
    let mut result = String::with_capacity(full_name.len());
    let mut chars = full_name.chars().peekable();
    let mut segment = String::new();

    while let Some(ch) = chars.next() {
        match ch {
            ':' if chars.peek() == Some(&':') => {
                chars.next();
                segment.clear();
            }
            '<' | '>' | ',' | ' ' | '(' | ')' | '&' => {
                result.push_str(&segment);
                result.push(ch);
                segment.clear();
            }
            _ => segment.push(ch),
        }
    }

    result.push_str(&segment);
    result
}

/// Suggests registered names that look like `requested`.
///
/// Candidates are scored by substring containment (full or shortened
/// name) and then by common prefix length; the best `max_suggestions`
/// are returned, best first.
pub fn suggest_similar(requested: &str, available: &[&str], max_suggestions: usize) -> Vec<String> {
    let requested_full = requested.to_lowercase();
    let requested_short = shorten_type_name(requested).to_lowercase();

    let mut scored: Vec<(&str, usize)> = available
        .iter()
        .filter_map(|&name| {
            let name_full = name.to_lowercase();
            let name_short = shorten_type_name(name).to_lowercase();

            if name_full.contains(&requested_full) || requested_full.contains(&name_full) {
                return Some((name, 100));
            }

            if name_short.contains(&requested_short) || requested_short.contains(&name_short) {
                return Some((name, 80));
            }

            let common = name_short
                .chars()
                .zip(requested_short.chars())
                .take_while(|(a, b)| a == b)
                .count();

            (common >= 3).then_some((name, common * 10))
        })
        .collect();

    scored.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    scored
        .into_iter()
        .take(max_suggestions)
        .map(|(name, _)| name.to_string())
        .collect()
}
