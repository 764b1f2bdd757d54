extern crate winresource;

fn main() {
    if std::env::var("CARGO_CFG_TARGET_OS").unwrap() == "windows" {
        let mut res = winresource::WindowsResource::new();
        res.set("FileDescription", "File type association helper");
        res.set("ProductName", "file-assoc");
        res.compile().unwrap();
    }
}
