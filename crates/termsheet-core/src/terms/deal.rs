use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::{pct_to_rate, Money, Multiple, Percent, Rate};

// ─── Enums ───────────────────────────────────────────────────────────────────

/// How the investor class shares in exit proceeds.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum PreferenceType {
    /// No preference: straight pro-rata split of proceeds.
    None,
    /// Investor takes the greater of the preference or its pro-rata share.
    #[default]
    NonParticipating,
    /// Investor takes the preference AND its pro-rata share of what remains.
    Participating,
    /// Participating, with total investor proceeds capped at a multiple of the investment.
    CappedParticipating,
}

impl fmt::Display for PreferenceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PreferenceType::None => "no",
            PreferenceType::NonParticipating => "non-participating",
            PreferenceType::Participating => "participating",
            PreferenceType::CappedParticipating => "capped participating",
        };
        f.write_str(label)
    }
}

/// Accrual convention for preferred dividends.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Compounding {
    /// Dividends are stated but never accrue into the preference.
    #[default]
    None,
    /// Accrue linearly on the original investment.
    Simple,
    /// Accrue annually on investment plus prior accruals.
    Compound,
}

impl fmt::Display for Compounding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Compounding::None => "non-accruing",
            Compounding::Simple => "simple",
            Compounding::Compound => "compounding",
        };
        f.write_str(label)
    }
}

// ─── Structs ─────────────────────────────────────────────────────────────────

/// Cumulative preferred dividend terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DividendTerms {
    /// Annual dividend rate in percentage points (8 = 8%).
    #[serde(alias = "ratePct", alias = "rate")]
    pub rate_pct: Percent,
    pub compounding: Compounding,
}

/// The liquidation preference attached to the investor's shares.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidationPreference {
    /// Multiple of invested capital returned first. Absent means 1x.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiple: Option<Multiple>,
    #[serde(alias = "type")]
    pub preference_type: PreferenceType,
    /// Cap on total investor proceeds as a multiple of the investment.
    /// Only meaningful for `CappedParticipating`.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "participationCapMultiple",
        alias = "participationCap"
    )]
    pub participation_cap_multiple: Option<Multiple>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dividends: Option<DividendTerms>,
}

impl LiquidationPreference {
    /// The stated multiple, or 1x when the terms are silent.
    pub fn effective_multiple(&self) -> Multiple {
        self.multiple.unwrap_or(Decimal::ONE)
    }
}

/// Structured description of a financing, as produced by the upstream
/// extraction step.
///
/// Every optional field means "unknown", not zero. Ownership and option pool
/// are independent fully-diluted percentages and are never reconciled here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealTerms {
    /// Capital invested in the round.
    #[serde(alias = "investmentAmount")]
    pub investment_amount: Money,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "preMoneyValuation"
    )]
    pub pre_money_valuation: Option<Money>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "postMoneyValuation"
    )]
    pub post_money_valuation: Option<Money>,
    /// Investor's stated post-close ownership, in points.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "investorOwnershipPct"
    )]
    pub investor_ownership_pct: Option<Percent>,
    /// Option pool as a percentage of fully diluted shares, in points.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        alias = "optionPoolPct"
    )]
    pub option_pool_pct: Option<Percent>,
    #[serde(alias = "liquidationPreference")]
    pub liquidation_preference: LiquidationPreference,
}

impl DealTerms {
    /// Investor ownership as a decimal rate, if stated.
    pub fn ownership_rate(&self) -> Option<Rate> {
        self.investor_ownership_pct.map(pct_to_rate)
    }

    /// Absolute ceiling on investor proceeds for capped participation.
    pub fn participation_cap_amount(&self) -> Option<Money> {
        let cap = self.liquidation_preference.participation_cap_multiple?;
        self.investment_amount.checked_mul(cap)
    }
}
