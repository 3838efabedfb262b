use reqwest::Url;

use crate::models::EntryKey;
use crate::storage::RemotePath;

/// Download location for `key` inside `path`: the single-file endpoint for
/// files, the archive endpoint for directories.
pub fn download_url(base: &Url, path: &RemotePath, key: &EntryKey) -> Url {
    let (endpoint, name_param) = if key.is_dir {
        ("api/storage/downloadDirectory", "directoryName")
    } else {
        ("api/storage/download", "fileName")
    };

    let mut url = base.clone();
    url.set_query(None);
    url.set_fragment(None);
    let prefix = url.path().trim_end_matches('/').to_string();
    url.set_path(&format!("{prefix}/{endpoint}"));
    url.query_pairs_mut()
        .append_pair("userPath", &path.as_query())
        .append_pair(name_param, &key.name);
    url
}
