fn generated() {}
