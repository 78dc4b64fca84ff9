// 🏷️ Profile Rules - Ordered classification of RFM classes
// First matching rule wins; later rules never see inputs an earlier one took

use crate::error::{Result, RfmError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ============================================================================
// PROFILE
// ============================================================================

/// Behavioural segment assigned to a customer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Profile {
    Champion,
    LoyalCustomer,
    PotentialLoyalist,
    NeedsAttention,
    AtRisk,
    AboutToSleep,
    Hibernating,
    Others,
}

impl Profile {
    pub const ALL: [Profile; 8] = [
        Profile::Champion,
        Profile::LoyalCustomer,
        Profile::PotentialLoyalist,
        Profile::NeedsAttention,
        Profile::AtRisk,
        Profile::AboutToSleep,
        Profile::Hibernating,
        Profile::Others,
    ];

    /// Label used in tables and API payloads
    pub fn label(&self) -> &'static str {
        match self {
            Profile::Champion => "champion",
            Profile::LoyalCustomer => "loyal_customer",
            Profile::PotentialLoyalist => "potential_loyalist",
            Profile::NeedsAttention => "needs_attention",
            Profile::AtRisk => "at_risk",
            Profile::AboutToSleep => "about_to_sleep",
            Profile::Hibernating => "hibernating",
            Profile::Others => "others",
        }
    }
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Profile {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Profile::ALL
            .into_iter()
            .find(|p| p.label() == s)
            .ok_or_else(|| format!("unknown profile: {s}"))
    }
}

// ============================================================================
// RFM CLASS
// ============================================================================

/// Three quartile scores, each 1..=4, in R, F, M order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RfmClass {
    pub r: u8,
    pub f: u8,
    pub m: u8,
}

impl RfmClass {
    pub fn new(r: u8, f: u8, m: u8) -> Result<Self> {
        if [r, f, m].iter().all(|s| (1..=4).contains(s)) {
            Ok(RfmClass { r, f, m })
        } else {
            Err(RfmError::InvalidClassCode(format!("{r}{f}{m}")))
        }
    }

    /// Parse a class code such as "231"
    pub fn parse(code: &str) -> Result<Self> {
        let invalid = || RfmError::InvalidClassCode(code.to_string());

        let digits: Vec<u8> = code
            .chars()
            .map(|c| c.to_digit(10).map(|d| d as u8))
            .collect::<Option<Vec<u8>>>()
            .ok_or_else(invalid)?;

        match digits.as_slice() {
            [r, f, m] => RfmClass::new(*r, *f, *m).map_err(|_| invalid()),
            _ => Err(invalid()),
        }
    }

    /// The 3-character code, e.g. "231"
    pub fn code(&self) -> String {
        format!("{}{}{}", self.r, self.f, self.m)
    }
}

impl fmt::Display for RfmClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.r, self.f, self.m)
    }
}

// ============================================================================
// RULE DEFINITION
// ============================================================================

/// One entry of the ordered rule chain
#[derive(Debug, Clone, Copy)]
pub struct ProfileRule {
    /// Rule ID for tracking
    pub id: &'static str,

    /// Human-readable condition
    pub condition: &'static str,

    pub profile: Profile,

    predicate: fn(u8, u8, u8) -> bool,
}

impl ProfileRule {
    pub fn matches(&self, class: RfmClass) -> bool {
        (self.predicate)(class.r, class.f, class.m)
    }
}

fn champion(r: u8, f: u8, m: u8) -> bool {
    r == 1 && f == 1 && m == 1
}

fn loyal_customer(r: u8, f: u8, m: u8) -> bool {
    r == 1 && f <= 2 && m <= 2
}

fn potential_loyalist(r: u8, f: u8, m: u8) -> bool {
    r <= 2 && f <= 3 && m <= 3
}

fn needs_attention(r: u8, f: u8, m: u8) -> bool {
    r == 3 && f == 3 && m == 3
}

fn at_risk(r: u8, f: u8, m: u8) -> bool {
    r == 4 && f == 4 && m == 4
}

fn about_to_sleep(r: u8, f: u8, _m: u8) -> bool {
    r >= 3 && f >= 3
}

fn hibernating(r: u8, _f: u8, _m: u8) -> bool {
    r == 4
}

/// Evaluated top to bottom. Rules 4 and 5 sit behind broader rules and only
/// see what those leave over; keep the order as is.
pub const PROFILE_RULES: [ProfileRule; 7] = [
    ProfileRule {
        id: "champion",
        condition: "r=1 and f=1 and m=1",
        profile: Profile::Champion,
        predicate: champion,
    },
    ProfileRule {
        id: "loyal_customer",
        condition: "r=1 and f<=2 and m<=2",
        profile: Profile::LoyalCustomer,
        predicate: loyal_customer,
    },
    ProfileRule {
        id: "potential_loyalist",
        condition: "r<=2 and f<=3 and m<=3",
        profile: Profile::PotentialLoyalist,
        predicate: potential_loyalist,
    },
    ProfileRule {
        id: "needs_attention",
        condition: "r=3 and f=3 and m=3",
        profile: Profile::NeedsAttention,
        predicate: needs_attention,
    },
    ProfileRule {
        id: "at_risk",
        condition: "r=4 and f=4 and m=4",
        profile: Profile::AtRisk,
        predicate: at_risk,
    },
    ProfileRule {
        id: "about_to_sleep",
        condition: "r>=3 and f>=3",
        profile: Profile::AboutToSleep,
        predicate: about_to_sleep,
    },
    ProfileRule {
        id: "hibernating",
        condition: "r=4",
        profile: Profile::Hibernating,
        predicate: hibernating,
    },
];

// ============================================================================
// CLASSIFICATION
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassificationResult {
    pub profile: Profile,

    /// Rule that fired; `None` when the chain fell through to `others`
    pub rule_id: Option<&'static str>,
}

/// Walk the chain and return the first rule that matches
pub fn classify_class(class: RfmClass) -> ClassificationResult {
    for rule in &PROFILE_RULES {
        if rule.matches(class) {
            return ClassificationResult {
                profile: rule.profile,
                rule_id: Some(rule.id),
            };
        }
    }

    ClassificationResult {
        profile: Profile::Others,
        rule_id: None,
    }
}

/// Classify a 3-digit class code
pub fn classify(code: &str) -> Result<Profile> {
    let class = RfmClass::parse(code)?;
    Ok(classify_class(class).profile)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_champion() {
        assert_eq!(classify("111").unwrap(), Profile::Champion);
    }

    #[test]
    fn test_loyal_customer() {
        assert_eq!(classify("112").unwrap(), Profile::LoyalCustomer);
        assert_eq!(classify("122").unwrap(), Profile::LoyalCustomer);
    }

    #[test]
    fn test_potential_loyalist() {
        assert_eq!(classify("233").unwrap(), Profile::PotentialLoyalist);
        // r=1 with f=3 misses rule 2 and lands here
        assert_eq!(classify("131").unwrap(), Profile::PotentialLoyalist);
    }

    #[test]
    fn test_all_threes_and_all_fours() {
        assert_eq!(classify("333").unwrap(), Profile::NeedsAttention);
        assert_eq!(classify("444").unwrap(), Profile::AtRisk);
    }

    #[test]
    fn test_about_to_sleep_shadows_hibernating() {
        assert_eq!(classify("344").unwrap(), Profile::AboutToSleep);
        assert_eq!(classify("443").unwrap(), Profile::AboutToSleep);
        assert_eq!(classify("434").unwrap(), Profile::AboutToSleep);
    }

    #[test]
    fn test_hibernating() {
        assert_eq!(classify("414").unwrap(), Profile::Hibernating);
        assert_eq!(classify("421").unwrap(), Profile::Hibernating);
    }

    #[test]
    fn test_others() {
        assert_eq!(classify("321").unwrap(), Profile::Others);
        assert_eq!(classify("134").unwrap(), Profile::Others);
        assert_eq!(classify("214").unwrap(), Profile::Others);
        assert_eq!(classify_class(RfmClass::parse("321").unwrap()).rule_id, None);
    }

    #[test]
    fn test_rule_id_reported() {
        let result = classify_class(RfmClass::parse("233").unwrap());
        assert_eq!(result.rule_id, Some("potential_loyalist"));
    }

    #[test]
    fn test_every_class_gets_a_profile() {
        for r in 1..=4 {
            for f in 1..=4 {
                for m in 1..=4 {
                    let class = RfmClass::new(r, f, m).unwrap();
                    let profile = classify_class(class).profile;
                    assert!(Profile::ALL.contains(&profile));
                    assert_eq!(class.code().len(), 3);
                }
            }
        }
    }

    #[test]
    fn test_invalid_class_codes() {
        for code in ["", "11", "1111", "1a1", "501", "105", "١١١", " 11"] {
            assert!(
                matches!(classify(code), Err(RfmError::InvalidClassCode(ref c)) if c == code),
                "expected InvalidClassCode for {code:?}"
            );
        }
    }

    #[test]
    fn test_profile_labels_round_trip() {
        for profile in Profile::ALL {
            assert_eq!(profile.label().parse::<Profile>().unwrap(), profile);
        }
        assert!("vip".parse::<Profile>().is_err());
    }
}
