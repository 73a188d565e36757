/// Check that an e-mail address belongs to one of the allowed university domains
///
/// The domain must equal an allowed entry or be a subdomain of one, so
/// `"edu.tr"` admits `ogr.metu.edu.tr` but not `notedu.tr`. An empty
/// allow-list admits any well-formed address.
pub fn is_university_email(email: &str, allowed_domains: &[String]) -> bool {
    let email = email.trim();
    let Some((local, domain)) = email.rsplit_once('@') else {
        return false;
    };
    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return false;
    }

    if allowed_domains.is_empty() {
        return true;
    }

    let domain = domain.to_lowercase();
    allowed_domains.iter().any(|allowed| {
        let allowed = allowed.trim().trim_start_matches('.').to_lowercase();
        !allowed.is_empty()
            && (domain == allowed || domain.ends_with(&format!(".{}", allowed)))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn domains(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_university_email_accepted() {
        let allowed = domains(&["edu.tr", "edu"]);

        assert!(is_university_email("ayse@metu.edu.tr", &allowed));
        assert!(is_university_email("e123@ogr.hacettepe.edu.tr", &allowed));
        assert!(is_university_email("Mehmet@Bilkent.EDU.TR", &allowed));
        assert!(is_university_email("sam@mit.edu", &allowed));
    }

    #[test]
    fn test_non_university_email_rejected() {
        let allowed = domains(&["edu.tr"]);

        assert!(!is_university_email("ayse@gmail.com", &allowed));
        assert!(!is_university_email("ayse@notedu.tr", &allowed));
        assert!(!is_university_email("edu.tr", &allowed));
        assert!(!is_university_email("@metu.edu.tr", &allowed));
    }

    #[test]
    fn test_empty_allow_list() {
        assert!(is_university_email("ayse@gmail.com", &[]));
        assert!(!is_university_email("not-an-email", &[]));
    }
}
