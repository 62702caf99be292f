use super::UsgsClient;

impl UsgsClient {
    /// Fetches the feed once. No retry: a feed that cannot be reached
    /// leaves the map without markers.
    pub fn fetch_feed(&self) -> Result<String, ureq::Error> {
        let mut response = self.agent.get(&self.url).call()?;
        if response.status() != 200 {
            return Err(ureq::Error::BadUri(format!(
                "feed returned status {}",
                response.status()
            )));
        }
        response.body_mut().read_to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::super::{USGS_ALL_DAY_FEED, UsgsClient};

    #[test]
    fn default_client_targets_the_all_day_feed() {
        let client = UsgsClient::default();
        assert_eq!(client.url, USGS_ALL_DAY_FEED);
        assert!(client.url.starts_with("https://earthquake.usgs.gov/"));
    }
}
