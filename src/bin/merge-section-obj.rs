use sectsize::{cli, LineFormat};

// format: Section (xx, yy): zz
fn main() {
    cli::main(&["file"], |paths, output| {
        sectsize::merge_file(LineFormat::Composite, &paths[0], output)
    });
}
