//! Multi-case dispatch.

use sift_ir::PatternId;
use sift_types::TypeOracle;
use tracing::{debug, trace};

use crate::errors::non_exhaustive_match;
use crate::{Bindings, EvalResult, MatchContext, MatchExecutor, MatchResult, Matcher, Value};

/// The first case that matched, with its bindings.
#[derive(Clone, Debug, PartialEq)]
pub struct CaseMatch {
    pub case: usize,
    pub bindings: Bindings,
}

/// Try `cases` in order against `subject`.
///
/// All cases share one [`MatchContext`], so a member read while trying one
/// case is not read again for the next. `guard` runs after a case matches,
/// with that case's bindings; returning `false` moves on to the next case.
///
/// When no case matches, the result is `Ok(None)` unless `exhaustive` is
/// set, in which case the switch was statically known to be exhaustive and
/// reaching the end is a fatal error.
#[tracing::instrument(level = "debug", skip_all, fields(cases = cases.len()))]
pub fn match_cases<O, H, G>(
    matcher: &mut Matcher<'_, O, H>,
    subject: &Value,
    cases: &[PatternId],
    mut guard: G,
    exhaustive: bool,
) -> EvalResult<Option<CaseMatch>>
where
    O: TypeOracle + ?Sized,
    H: MatchExecutor + ?Sized,
    G: FnMut(usize, &Bindings) -> EvalResult<bool>,
{
    let mut ctx = MatchContext::new();
    for (case, &root) in cases.iter().enumerate() {
        let MatchResult::Matched(bindings) = matcher.match_pattern(root, subject, &mut ctx)? else {
            continue;
        };
        if !guard(case, &bindings)? {
            trace!(case, "guard rejected case");
            continue;
        }
        debug!(
            case,
            hits = ctx.cache().hits(),
            misses = ctx.cache().misses(),
            "case matched"
        );
        return Ok(Some(CaseMatch { case, bindings }));
    }
    if exhaustive {
        let found = matcher.runtime_type_name(subject);
        return Err(non_exhaustive_match(&found));
    }
    Ok(None)
}

/// `match_cases` without guards.
pub fn first_match<O, H>(
    matcher: &mut Matcher<'_, O, H>,
    subject: &Value,
    cases: &[PatternId],
    exhaustive: bool,
) -> EvalResult<Option<CaseMatch>>
where
    O: TypeOracle + ?Sized,
    H: MatchExecutor + ?Sized,
{
    match_cases(matcher, subject, cases, |_, _| Ok(true), exhaustive)
}
