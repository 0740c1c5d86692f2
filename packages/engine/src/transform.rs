//! Inline `transform` parsing and rebuilding.
//!
//! The manipulation engine only drives the 2-D translate channel. Any
//! other transform component on the element (rotate, scale, skew) is
//! preserved verbatim when we rewrite the translate, never discarded.
//! `matrix(...)` is absorbed: its translation terms are read as the
//! origin and the function is replaced by the explicit translate we
//! write. A missing or unparsable transform reads as a `(0, 0)` origin.

struct TransformFn {
    /// Lowercased function name.
    name: String,
    args: Vec<String>,
    /// Original source text, `name(args)` exactly as written.
    raw: String,
}

/// Extract the 2-D translate components from a transform string.
///
/// Understands `translate(x[, y])`, `translateX`/`translateY`,
/// `translate3d(x, y, z)` and the `e`/`f` terms of `matrix(...)`. Returns
/// `(0, 0)` when nothing parses; never fails.
pub fn parse_translate(transform: &str) -> (f64, f64) {
    let mut tx = 0.0;
    let mut ty = 0.0;

    for func in functions(transform) {
        match func.name.as_str() {
            "translate" | "translate3d" => {
                if let Some(x) = func.args.first().and_then(|a| parse_px(a)) {
                    tx = x;
                    // Single-argument translate means y = 0
                    ty = func.args.get(1).and_then(|a| parse_px(a)).unwrap_or(0.0);
                }
            }
            "translatex" => {
                if let Some(x) = func.args.first().and_then(|a| parse_px(a)) {
                    tx = x;
                }
            }
            "translatey" => {
                if let Some(y) = func.args.first().and_then(|a| parse_px(a)) {
                    ty = y;
                }
            }
            "matrix" => {
                if func.args.len() == 6 {
                    if let (Some(e), Some(f)) = (parse_px(&func.args[4]), parse_px(&func.args[5]))
                    {
                        tx = e;
                        ty = f;
                    }
                }
            }
            _ => {}
        }
    }

    (tx, ty)
}

/// Rebuild a transform string with translate set to `(x, y)` (rounded to
/// whole pixels), keeping every non-translate component in its original
/// order after the new translate.
pub fn with_translate(transform: Option<&str>, x: f64, y: f64) -> String {
    let mut result = format!("translate({}px, {}px)", x.round() as i64, y.round() as i64);

    if let Some(existing) = transform {
        for func in functions(existing) {
            if is_translate_channel(&func.name) {
                continue;
            }
            result.push(' ');
            result.push_str(&func.raw);
        }
    }

    result
}

/// Functions owned by the translate channel, replaced on every write.
fn is_translate_channel(name: &str) -> bool {
    matches!(
        name,
        "translate" | "translatex" | "translatey" | "translate3d" | "matrix"
    )
}

/// Split a transform list into its function components. Malformed
/// trailing garbage is dropped.
fn functions(transform: &str) -> Vec<TransformFn> {
    let mut out = Vec::new();
    let mut offset = 0;

    while let Some(open_rel) = transform[offset..].find('(') {
        let open = offset + open_rel;
        let name = transform[offset..open].trim().to_ascii_lowercase();
        let Some(close_rel) = transform[open..].find(')') else {
            break;
        };
        let close = open + close_rel;

        if !name.is_empty() {
            let args: Vec<String> = transform[open + 1..close]
                .split(',')
                .map(|a| a.trim().to_string())
                .filter(|a| !a.is_empty())
                .collect();
            let raw = transform[offset..=close].trim().to_string();
            out.push(TransformFn { name, args, raw });
        }
        offset = close + 1;
    }

    out
}

/// Parse a px-or-unitless numeric argument.
fn parse_px(arg: &str) -> Option<f64> {
    arg.trim()
        .trim_end_matches("px")
        .trim()
        .parse::<f64>()
        .ok()
}
