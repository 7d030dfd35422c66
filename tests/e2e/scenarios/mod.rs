mod happy_path;
mod sessions;
