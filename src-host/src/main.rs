fn main() {
    unzipper_lib::run()
}
