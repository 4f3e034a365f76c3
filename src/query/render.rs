//! Token substitution
//!
//! Every occurrence of every token gets its own uniform draw from the token's
//! candidate list, so `:a + :a` can render as `1 + 2`. Tokens with no candidates
//! in the pool are copied through verbatim.

use super::{Segment, Template};
use crate::config::ParameterPool;
use rand::seq::SliceRandom;
use rand::Rng;

/// Render a template with values drawn from `pool`
///
/// # Example
///
/// ```
/// use sqlpulse::config::{ParameterPool, ParamValue};
/// use sqlpulse::query::{Template, render::render};
/// use rand::SeedableRng;
/// use rand_xoshiro::Xoshiro256PlusPlus;
///
/// let template = Template::new("select * from t where id = :id and v = :missing");
/// let mut pool = ParameterPool::new();
/// pool.insert("id".to_string(), vec![ParamValue::Int(7)]);
///
/// let mut rng = Xoshiro256PlusPlus::seed_from_u64(1);
/// let sql = render(&template, &pool, &mut rng);
/// assert_eq!(sql, "select * from t where id = 7 and v = :missing");
/// ```
pub fn render<R: Rng + ?Sized>(template: &Template, pool: &ParameterPool, rng: &mut R) -> String {
    let text = template.text();
    let mut out = String::with_capacity(text.len());

    for segment in &template.segments {
        match segment {
            Segment::Literal(range) => out.push_str(&text[range.clone()]),
            Segment::Token { span, name } => {
                let value = pool
                    .get(&text[name.clone()])
                    .and_then(|candidates| candidates.choose(rng));
                match value {
                    Some(value) => out.push_str(&value.to_string()),
                    None => out.push_str(&text[span.clone()]),
                }
            }
        }
    }

    out
}
