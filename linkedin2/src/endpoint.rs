use enumscribe::ScribeStaticStr;

/// LinkedIn v2 resources, relative to the API base URL.
#[derive(ScribeStaticStr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Endpoint {
    #[enumscribe(str = "connections")]
    Connections,
    #[enumscribe(str = "people")]
    People,
    #[enumscribe(str = "people-search")]
    PeopleSearch,
    #[enumscribe(str = "groups")]
    Groups,
    #[enumscribe(str = "ugcPosts")]
    Posts,
    #[enumscribe(str = "shares")]
    Shares,
    #[enumscribe(str = "companies")]
    Companies,
    #[enumscribe(str = "company-search")]
    CompanySearch,
    #[enumscribe(str = "jobs")]
    Jobs,
    #[enumscribe(str = "job-search")]
    JobSearch,
}

impl Endpoint {
    pub fn as_str(self) -> &'static str {
        self.scribe()
    }

    pub fn url(self, api_base_url: &str) -> String {
        format!("{}/{}", api_base_url.trim_end_matches('/'), self.as_str())
    }
}

#[derive(ScribeStaticStr, Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum NetworkUpdate {
    #[enumscribe(str = "APPS")]
    Application,
    #[enumscribe(str = "CMPY")]
    Company,
    #[enumscribe(str = "CONN")]
    Connection,
    #[enumscribe(str = "JOBS")]
    Job,
    #[enumscribe(str = "JGRP")]
    Group,
    #[enumscribe(str = "PICT")]
    Picture,
    #[enumscribe(str = "PRFX")]
    ExtendedProfile,
    #[enumscribe(str = "PRFU")]
    ChangedProfile,
    #[enumscribe(str = "SHAR")]
    Shared,
    #[enumscribe(str = "VIRL")]
    Viral,
}

impl NetworkUpdate {
    pub fn as_str(self) -> &'static str {
        self.scribe()
    }
}
