use std::fs;
use std::io;
use std::path::Path;

const CONFIG_SAMPLE: &str = r#"# For the file locations, If you want it to be relative to the executable directory
# use ${exe_dir}/location
[server]
address = "0.0.0.0"
port = 8001

# Without a location the blogs are kept in memory only
[store]
location = "${exe_dir}/data/blogs.json"

[client]
base_url = "http://localhost:8001"
page_size = 6

[log]
level = "Info"
log_to_console = true
"#;

pub(crate) fn write_sample_cfg(file_path: &Path) -> io::Result<()> {
    if file_path.exists() {
        return Err(io::Error::new(io::ErrorKind::AlreadyExists,
                                  format!("{} already exists", file_path.display())));
    }
    fs::write(file_path, CONFIG_SAMPLE)
}
