// Ordered rule tables.
//
// A rule is a (tag, predicate, score delta) triple. Tables are evaluated top
// to bottom; every rule whose predicate holds contributes its delta and
// appends its tag, so tags always come out in table order.

/// One entry of a rule table over context `C` producing tags of type `T`.
pub struct Rule<C, T> {
    pub tag: T,
    pub applies: fn(&C) -> bool,
    /// Score adjustment when the rule fires. Zero for flag-only tables.
    pub delta: i32,
}

/// Result of running a rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleOutcome<T> {
    /// Starting score plus the deltas of every rule that fired (unclamped).
    pub score: i32,
    /// Tags of the rules that fired, in table order.
    pub tags: Vec<T>,
}

/// Evaluate `rules` against `ctx` starting from `start`.
pub fn evaluate_rules<C, T: Copy>(rules: &[Rule<C, T>], ctx: &C, start: i32) -> RuleOutcome<T> {
    let mut score = start;
    let mut tags = Vec::new();
    for rule in rules {
        if (rule.applies)(ctx) {
            score += rule.delta;
            tags.push(rule.tag);
        }
    }
    RuleOutcome { score, tags }
}
