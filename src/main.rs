fn main() -> std::process::ExitCode {
    rconsole_lib::run()
}
