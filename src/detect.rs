//! Bank template detection from first-page text.
//!
//! Each bank entry holds an ordered phrase list: the first phrase identifies
//! the bank, the rest discriminate between that bank's statement layouts
//! (different account products use different PDF templates). A bank is only
//! selected when its primary phrase and one account phrase both occur.

use crate::types::Bank;

/// Marker phrases per bank: `[primary, account phrases...]`.
const BANK_MARKERS: &[(Bank, &[&str])] = &[
    (
        Bank::Cba,
        &[
            "by logging on to the CommBank App or NetBank.",
            "Business Transaction Account",
        ],
    ),
    (
        Bank::Anz,
        &[
            "WELCOME TO YOUR ANZ ACCOUNT AT A GLANCE ",
            "BUSINESS ADVANTAGE STATEMENT",
            "BUSINESS ONLINE SAVER STATEMENT",
            "BUSINESS EXTRA STATEMENT",
        ],
    ),
    (
        Bank::Nab,
        &[
            "National Australia Bank Limited ABN 12 004 044 937 AFSL and Australian Credit Licence 230686",
            "Transaction Account",
            "BUSINESS EVERYDAY AC",
            "BUSINESS CHEQUE ACCOUNT",
        ],
    ),
    (
        Bank::Wbc,
        &[
            "ABN 33 007 457 141",
            "Transaction Search",
            "Electronic Statement",
        ],
    ),
    (
        Bank::Ben,
        &[
            "Bendigo and Adelaide Bank Limited ABN 11 068 049 178 AFSL/Australian Credit Licence 237879",
            "Business Basic Account",
        ],
    ),
    (
        Bank::Mqg,
        &[
            "Macquarie Bank Limited ABN 46 008 583 542",
            "Transaction account",
            "Cash Management Account",
        ],
    ),
    (
        Bank::Zel,
        &[
            "Zeller Australia Pty Ltd ABN 55 645 973 174",
            "Zeller Transaction Account",
        ],
    ),
];

/// Result of template detection: the bank plus the account phrase that
/// matched, which names the sub-template within that bank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub bank: Bank,
    pub account: String,
}

/// Scan first-page text against the marker table. Returns `None` when no
/// template matches; callers must treat that as a hard error.
pub fn detect(first_page_text: &str) -> Option<Detection> {
    for (bank, phrases) in BANK_MARKERS {
        let (primary, accounts) = phrases.split_first()?;
        if !first_page_text.contains(primary) {
            continue;
        }
        for account in accounts {
            if first_page_text.contains(account) {
                return Some(Detection {
                    bank: *bank,
                    account: account.to_string(),
                });
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(
        "Statement period 01 Jul 2023 to 31 Jul 2023\n\
         Business Transaction Account\n\
         View your statements by logging on to the CommBank App or NetBank.",
        Bank::Cba,
        "Business Transaction Account"
    )]
    #[case(
        "WELCOME TO YOUR ANZ ACCOUNT AT A GLANCE \nBUSINESS EXTRA STATEMENT\n",
        Bank::Anz,
        "BUSINESS EXTRA STATEMENT"
    )]
    #[case(
        "National Australia Bank Limited ABN 12 004 044 937 AFSL and Australian Credit Licence 230686\n\
         BUSINESS CHEQUE ACCOUNT\n",
        Bank::Nab,
        "BUSINESS CHEQUE ACCOUNT"
    )]
    #[case(
        "Westpac Banking Corporation ABN 33 007 457 141\nTransaction Search\n",
        Bank::Wbc,
        "Transaction Search"
    )]
    #[case(
        "Business Basic Account\n\
         Bendigo and Adelaide Bank Limited ABN 11 068 049 178 AFSL/Australian Credit Licence 237879",
        Bank::Ben,
        "Business Basic Account"
    )]
    #[case(
        "Macquarie Bank Limited ABN 46 008 583 542\nCash Management Account\n",
        Bank::Mqg,
        "Cash Management Account"
    )]
    #[case(
        "Zeller Australia Pty Ltd ABN 55 645 973 174\nZeller Transaction Account\n",
        Bank::Zel,
        "Zeller Transaction Account"
    )]
    fn test_detect_known_templates(
        #[case] text: &str,
        #[case] bank: Bank,
        #[case] account: &str,
    ) {
        let detection = detect(text).unwrap();
        assert_eq!(detection.bank, bank);
        assert_eq!(detection.account, account);
    }

    #[test]
    fn test_detect_requires_account_phrase() {
        // Primary marker alone is not enough: the account phrase selects the
        // sub-template, and without one the converter choice is ambiguous.
        let text = "WELCOME TO YOUR ANZ ACCOUNT AT A GLANCE \nsome other content";
        assert!(detect(text).is_none());
    }

    #[test]
    fn test_detect_unknown_text() {
        assert!(detect("A totally unrelated document").is_none());
        assert!(detect("").is_none());
    }

    #[test]
    fn test_detect_is_deterministic() {
        let text = "Macquarie Bank Limited ABN 46 008 583 542\nTransaction account\n";
        let first = detect(text);
        let second = detect(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_marker_table_shape() {
        // Every entry has a primary phrase plus at least one account phrase.
        for (_, phrases) in BANK_MARKERS {
            assert!(phrases.len() >= 2);
        }
    }
}
