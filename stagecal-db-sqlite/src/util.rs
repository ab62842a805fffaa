use stagecal_core::entities::Url;

pub fn load_url(url: String) -> Option<Url> {
    url.parse()
        .map_err(|err| {
            // This should never happen if URLs have been validated properly on insert
            log::error!("Failed to load invalid URL '{url}': {err}");
            err
        })
        .ok()
}
