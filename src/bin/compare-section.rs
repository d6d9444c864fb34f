use sectsize::cli;

fn main() {
    cli::main(&["file1", "file2"], |paths, output| {
        sectsize::compare_files(&paths[0], &paths[1], output)
    });
}
