fn main() {
    dragon_arena::game::run();
}
