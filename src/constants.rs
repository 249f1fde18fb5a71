pub mod uploads {

    pub const ALLOWED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

    /// UTC timestamp prefix for stored filenames, microsecond precision.
    /// Uniqueness of the prefix is what keeps concurrent uploads of
    /// identically named files from colliding.
    pub const FILENAME_TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S%6f";
}

pub mod sweep {

    pub const DEFAULT_ARCHIVE_AFTER_DAYS: u32 = 30;
}

pub mod stats {

    pub const MONTHLY_BUCKETS: usize = 12;
}
