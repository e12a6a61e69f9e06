//! Static readiness rule table.
//!
//! Each rule is plain data: a label shown to reviewers, a point weight, and a
//! set of regex patterns. A rule fires when ANY of its patterns matches the
//! lower-cased note text; repeated matches of the same rule count once.
//!
//! Changing anything in `RULE_TABLE` (labels, weights, patterns or order) changes
//! scores, so bump `cache::CURRENT_VERSION` together with it.

use once_cell::sync::Lazy;
use regex::{RegexSet, RegexSetBuilder};

/// One row of the rule table.
#[derive(Debug, Clone, Copy)]
pub struct RuleSpec {
    pub label: &'static str,
    pub points: u32,
    pub patterns: &'static [&'static str],
}

/// Declaration order matters: drivers are emitted (and truncated) in this order.
pub const RULE_TABLE: &[RuleSpec] = &[
    RuleSpec {
        label: "load indicators",
        points: 18,
        patterns: &[
            r"\bfactory\b",
            r"\bwarehouse\b",
            r"\bmanufactur",
            r"\brefrigerat",
            r"\bcold storage\b",
            r"\bhvac\b",
            r"\bchiller\b",
        ],
    },
    RuleSpec {
        label: "electrical infrastructure",
        points: 22,
        patterns: &[
            r"\btransformer\b",
            r"\bswitchgear\b",
            r"\bsubstation\b",
            r"\bswitchyard\b",
            r"\bthree[- ]phase\b",
        ],
    },
    RuleSpec {
        label: "onsite generation",
        points: 14,
        patterns: &[r"\bsolar\b", r"\bPV\b", r"\binverter\b"],
    },
    RuleSpec {
        label: "siting space",
        points: 18,
        patterns: &[
            r"\blot\b",
            r"\bparking\b",
            r"\byard\b",
            r"\bempty space\b",
            r"\bpaved\b",
        ],
    },
    RuleSpec {
        label: "logistics / industrial use",
        points: 12,
        patterns: &[
            r"\bloading dock\b",
            r"\bforklift\b",
            r"\bdistribution\b",
            r"\btruck\b",
            r"\bcontainer\b",
        ],
    },
    RuleSpec {
        label: "contact captured",
        points: 16,
        patterns: &[
            r"\bfacilities\b",
            r"\bmanager\b",
            r"\bmaintenance\b",
            r"\bbusiness card\b",
            r"\bphone\b",
            r"@",
        ],
    },
];

/// A rule with its patterns compiled into a single set.
#[derive(Debug)]
pub struct CompiledRule {
    pub spec: RuleSpec,
    set: RegexSet,
}

impl CompiledRule {
    fn compile(spec: RuleSpec) -> Result<Self, regex::Error> {
        let set = RegexSetBuilder::new(spec.patterns)
            .case_insensitive(true)
            .build()?;
        Ok(Self { spec, set })
    }

    /// True if any pattern of the rule matches somewhere in `text`.
    #[inline]
    pub fn fires(&self, text: &str) -> bool {
        self.set.is_match(text)
    }
}

static COMPILED: Lazy<Vec<CompiledRule>> = Lazy::new(|| {
    RULE_TABLE
        .iter()
        .map(|spec| CompiledRule::compile(*spec).expect("built-in rule patterns compile"))
        .collect()
});

/// Compiled view of `RULE_TABLE`, in declaration order.
pub fn compiled() -> &'static [CompiledRule] {
    &COMPILED
}

/// Sum of all rule weights (the raw score when every rule fires).
pub fn total_points() -> u32 {
    RULE_TABLE.iter().map(|r| r.points).sum()
}
