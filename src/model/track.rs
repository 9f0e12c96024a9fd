//! Track records as returned by the catalog API

use serde::Deserialize;

/// One playable item from the catalog
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct Track {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub artist_name: String,
    #[serde(default)]
    pub album_image: String,
    #[serde(default)]
    pub audio: Option<String>,
    /// Length in seconds, when the catalog reports it
    #[serde(default)]
    pub duration: Option<u32>,
}

impl Track {
    /// The stream URL, if the track has a playable one.
    pub fn stream_url(&self) -> Option<&str> {
        self.audio.as_deref().filter(|url| !url.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_audio_is_not_playable() {
        let track = Track {
            audio: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(track.stream_url(), None);

        let track = Track {
            audio: Some("https://prod-1.storage.jamendo.com/?trackid=1".to_string()),
            ..Default::default()
        };
        assert_eq!(
            track.stream_url(),
            Some("https://prod-1.storage.jamendo.com/?trackid=1")
        );
    }

    #[test]
    fn deserializes_catalog_entry() {
        let json = r#"{
            "id": "1886257",
            "name": "Wake Up",
            "duration": 214,
            "artist_name": "Ivan Arn",
            "album_image": "https://usercontent.jamendo.com?type=album&id=1",
            "audio": "https://prod-1.storage.jamendo.com/?trackid=1886257&format=mp31"
        }"#;
        let track: Track = serde_json::from_str(json).unwrap();
        assert_eq!(track.name, "Wake Up");
        assert_eq!(track.artist_name, "Ivan Arn");
        assert_eq!(track.duration, Some(214));
        assert!(track.stream_url().is_some());
    }
}
