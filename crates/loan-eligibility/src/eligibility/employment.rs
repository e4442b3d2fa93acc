const SALARIED_MARKER: &str = "(salaried)";
const SELF_EMPLOYED_MARKERS: [&str; 2] = ["(self employed)", "(self-employed)"];

/// Checks the employment convention encoded in a loan type's display name.
///
/// Names tagged `(Salaried)` accept only "Salaried"; names tagged `(Self Employed)` or
/// `(Self-Employed)` accept "Self Employed" or "Self-Employed". All comparisons ignore ASCII
/// case and the employment type is trimmed. Untagged names accept any employment type.
pub fn employment_type_matches(employment_type: &str, loan_type_name: &str) -> bool {
    let name = loan_type_name.to_ascii_lowercase();
    let employment = employment_type.trim();

    if name.contains(SALARIED_MARKER) {
        return employment.eq_ignore_ascii_case("Salaried");
    }

    if SELF_EMPLOYED_MARKERS
        .iter()
        .any(|marker| name.contains(marker))
    {
        return employment.eq_ignore_ascii_case("Self Employed")
            || employment.eq_ignore_ascii_case("Self-Employed");
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn salaried_marker_requires_salaried_applicant() {
        assert!(employment_type_matches("Salaried", "Personal Loan (Salaried)"));
        assert!(employment_type_matches("  sALARIED ", "personal loan (SALARIED)"));
        assert!(!employment_type_matches("Self Employed", "Personal Loan (Salaried)"));
    }

    #[test]
    fn self_employed_marker_accepts_both_spellings() {
        for name in ["Business Loan (Self Employed)", "Business Loan (self-employed)"] {
            assert!(employment_type_matches("Self Employed", name));
            assert!(employment_type_matches("self-employed", name));
            assert!(!employment_type_matches("Salaried", name));
            assert!(!employment_type_matches("SelfEmployed", name));
        }
    }

    #[test]
    fn untagged_names_are_permissive() {
        assert!(employment_type_matches("Contractor", "Gold Loan"));
        assert!(employment_type_matches("Salaried", "Home Loan - Salaried"));
    }
}
