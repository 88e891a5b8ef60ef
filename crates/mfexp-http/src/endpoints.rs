//! Endpoint path templates of the external expense API.

use std::borrow::Cow;

pub(crate) const OFFICES: &str = "/offices";

pub(crate) fn ex_transactions(office_id: &str) -> String {
    format!("/offices/{}/me/ex_transactions", segment(office_id))
}

pub(crate) fn ex_transaction(office_id: &str, id: &str) -> String {
    format!("{}/{}", ex_transactions(office_id), segment(id))
}

pub(crate) fn member_ex_transactions(office_id: &str, member_id: &str) -> String {
    format!(
        "/offices/{}/office_members/{}/ex_transactions",
        segment(office_id),
        segment(member_id)
    )
}

pub(crate) fn ex_reports(office_id: &str) -> String {
    format!("/offices/{}/me/ex_reports", segment(office_id))
}

pub(crate) fn ex_report(office_id: &str, id: &str) -> String {
    format!("{}/{}", ex_reports(office_id), segment(id))
}

pub(crate) fn ex_report_types(office_id: &str) -> String {
    format!("/offices/{}/ex_report_types", segment(office_id))
}

/// Percent-encode one path segment, keeping RFC 3986 unreserved characters.
fn segment(s: &str) -> Cow<'_, str> {
    urlencoding::encode(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_paths() {
        assert_eq!(ex_transactions("OFF1"), "/offices/OFF1/me/ex_transactions");
        assert_eq!(
            ex_transaction("OFF1", "T1"),
            "/offices/OFF1/me/ex_transactions/T1"
        );
        assert_eq!(
            member_ex_transactions("OFF1", "M9"),
            "/offices/OFF1/office_members/M9/ex_transactions"
        );
    }

    #[test]
    fn report_paths() {
        assert_eq!(ex_reports("OFF2"), "/offices/OFF2/me/ex_reports");
        assert_eq!(ex_report("OFF2", "R1"), "/offices/OFF2/me/ex_reports/R1");
        assert_eq!(ex_report_types("OFF2"), "/offices/OFF2/ex_report_types");
    }

    #[test]
    fn segments_are_encoded() {
        assert_eq!(ex_transaction("OFF1", "a/b c"), "/offices/OFF1/me/ex_transactions/a%2Fb%20c");
        assert_eq!(ex_report("OFF1", "..?#"), "/offices/OFF1/me/ex_reports/..%3F%23");
        assert_eq!(ex_report_types("事業所"), "/offices/%E4%BA%8B%E6%A5%AD%E6%89%80/ex_report_types");
    }
}
