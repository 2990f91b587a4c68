use enumscribe::ScribeStaticStr;

/// The OAuth scopes an application can request from a LinkedIn member.
#[derive(ScribeStaticStr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Permission {
    #[enumscribe(str = "rw_company_admin")]
    CompanyAdmin,
    #[enumscribe(str = "r_basicprofile")]
    BasicProfile,
    #[enumscribe(str = "r_fullprofile")]
    FullProfile,
    #[enumscribe(str = "r_emailaddress")]
    EmailAddress,
    #[enumscribe(str = "r_network")]
    Network,
    #[enumscribe(str = "r_contactinfo")]
    ContactInfo,
    #[enumscribe(str = "rw_nus")]
    NetworkUpdates,
    #[enumscribe(str = "rw_groups")]
    Groups,
    #[enumscribe(str = "w_messages")]
    Messages,
}

impl Permission {
    pub fn as_str(self) -> &'static str {
        self.scribe()
    }
}

impl AsRef<str> for Permission {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

pub(crate) fn collect_permissions<I, S>(permissions: I) -> Vec<Box<str>>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    permissions
        .into_iter()
        .map(|permission| Box::from(permission.as_ref()))
        .collect()
}

/// Joins the scopes with single spaces, the way LinkedIn's `scope` parameter expects them.
pub(crate) fn join_scopes(permissions: &[Box<str>]) -> String {
    permissions.join(" ").trim().to_owned()
}
