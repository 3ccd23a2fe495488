pub mod proxy_to_clash;
