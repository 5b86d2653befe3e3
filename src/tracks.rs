use std::collections::BTreeSet;

const QUOTES: [char; 2] = ['"', '\''];

/// Deduplicates track names, drops the ones containing an excluded word and
/// strips quote characters. The result is sorted.
pub fn filter_tracks<S: AsRef<str>>(tracks: &[String], excluded: &[S]) -> Vec<String> {
    let unique: BTreeSet<&str> = tracks.iter().map(String::as_str).collect();

    // Stripping quotes may produce new duplicates, so collect into a set again
    let filtered: BTreeSet<String> = unique
        .into_iter()
        .filter_map(|track| {
            let stripped = track.replace(QUOTES, "");
            let is_excluded = excluded.iter().any(|word| {
                let word = word.as_ref();
                track.contains(word) || stripped.contains(word)
            });
            (!is_excluded).then_some(stripped)
        })
        .collect();

    filtered.into_iter().collect()
}

/// File name a track is stored under in the music folder
pub fn track_file_name(track: &str) -> String {
    format!("{}.mp3", track.replace('/', "-"))
}
