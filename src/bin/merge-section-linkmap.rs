use sectsize::{cli, LineFormat};

// format: xxx: zz
fn main() {
    cli::main(&["file"], |paths, output| {
        sectsize::merge_file(LineFormat::Simple, &paths[0], output)
    });
}
